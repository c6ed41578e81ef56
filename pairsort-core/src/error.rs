/// Error types for the sort engine.
///
/// Every failure is synchronous and leaves the caller's state untouched: the
/// engine takes a state by reference and produces a new one, so an `Err`
/// simply means no transition happened. The caller may retry with a corrected
/// decision or reload a known-good persisted state.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    /// The state is structurally inconsistent for the attempted transition
    /// (e.g. a binary-search cursor whose range falls outside the main
    /// chain). Only reachable via hand-edited or corrupted persisted states.
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    /// The supplied decision names neither side of the current pair.
    #[error("decision {id:?} matches neither item of the current pair")]
    UnknownDecision { id: String },

    /// Persisted state text could not be parsed (or a state could not be
    /// encoded). There is no partial recovery; the caller decides whether to
    /// discard the session and start over.
    #[error("malformed state text: {0}")]
    MalformedState(#[from] serde_json::Error),
}
