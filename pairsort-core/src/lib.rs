/// pairsort-core: externally-paced merge-insertion (Ford-Johnson) sorting.
///
/// Sorts a collection by taste using pairwise comparisons, asking close to
/// the minimum number of questions. The engine never decides anything
/// itself: it presents one pair, suspends as an immutable state value, and
/// waits for the caller to supply the preferred item's id — from a person, a
/// script, or a replay log. No IO, no clock, no filesystem; bring your own
/// decision provider.
///
/// States serialize to portable JSON text, so a session can outlive the
/// process and resume days later mid-comparison.
///
/// # Quick start
///
/// ```rust
/// use pairsort_core::{apply_decision, start_session, Item};
///
/// let items = vec![
///     Item::new("so-what", "So What"),
///     Item::new("naima", "Naima"),
///     Item::new("moanin", "Moanin'"),
/// ];
///
/// let mut state = start_session(&items);
/// while let Some(winner) = state.current_pair().map(|p| p.left.id.clone()) {
///     // A real caller asks a human; here the left item always wins.
///     state = apply_decision(&state, &winner).unwrap();
/// }
///
/// let ranking = state.ranking().unwrap();
/// assert_eq!(ranking.len(), 3);
/// ```
pub mod engine;
pub mod error;
pub mod jacobsthal;
pub mod serialize;
pub mod types;

mod insertion;
mod pairing;

// Re-export primary public API at crate root.
pub use engine::{apply_decision, start_session, worst_case_comparisons};
pub use error::SortError;
pub use jacobsthal::insertion_order;
pub use serialize::{deserialize_state, serialize_state};
pub use types::{
    BinarySearchCursor, ComparisonPair, CompletedState, InsertionState, Item, PairingMap,
    PairingState, Phase, RoundRecord, SortState,
};
