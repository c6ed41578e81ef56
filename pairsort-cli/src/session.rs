/// Session persistence: items + serialized engine state + undo history.
///
/// The contract with the engine is persist-then-present: the state reached
/// by a decision is written to disk before the next pair is shown, so a
/// crash at any point resumes from the last answered comparison. Saves go
/// through a temp file and rename, so an interrupted write never clobbers a
/// resumable session. The engine state is stored verbatim as the text the
/// core produced; this file never re-encodes it.
use pairsort_core::{deserialize_state, serialize_state, Item, SortState};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SESSION_FILE: &str = "pairsort-session.json";
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// On-disk layout.
#[derive(Serialize, Deserialize)]
struct SessionFile {
    items: Vec<Item>,
    /// Engine state, exactly as `serialize_state` produced it.
    state: String,
    /// Prior engine states, oldest first, for undo.
    history: Vec<String>,
    decisions: usize,
}

#[derive(Debug)]
pub struct Session {
    pub items: Vec<Item>,
    pub state: SortState,
    pub decisions: usize,
    history: Vec<String>,
    history_limit: usize,
}

impl Session {
    pub fn new(items: Vec<Item>, state: SortState, history_limit: usize) -> Self {
        Session {
            items,
            state,
            decisions: 0,
            history: Vec::new(),
            history_limit,
        }
    }

    pub fn load(path: &Path, history_limit: usize) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: SessionFile = serde_json::from_str(&content)?;
        let state = deserialize_state(&file.state).map_err(invalid_data)?;
        debug!(path = %path.display(), decisions = file.decisions, "session loaded");
        Ok(Session {
            items: file.items,
            state,
            decisions: file.decisions,
            history: file.history,
            history_limit,
        })
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = SessionFile {
            items: self.items.clone(),
            state: serialize_state(&self.state).map_err(invalid_data)?,
            history: self.history.clone(),
            decisions: self.decisions,
        };
        let text = serde_json::to_string_pretty(&file)?;

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Record a decision's outcome: the old state joins the undo history and
    /// `next` becomes current. Call `save` afterwards, before presenting the
    /// next pair.
    pub fn push(&mut self, next: SortState) -> io::Result<()> {
        let prev = serialize_state(&self.state).map_err(invalid_data)?;
        self.history.push(prev);
        if self.history.len() > self.history_limit {
            self.history.remove(0);
        }
        self.state = next;
        self.decisions += 1;
        Ok(())
    }

    /// Step back one decision. Returns false when there is nothing to undo
    /// (or the stored history entry no longer parses).
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.pop() else {
            return false;
        };
        match deserialize_state(&prev) {
            Ok(state) => {
                self.state = state;
                self.decisions = self.decisions.saturating_sub(1);
                true
            }
            Err(e) => {
                debug!(error = %e, "discarding unparseable undo entry");
                false
            }
        }
    }
}

fn invalid_data(e: pairsort_core::SortError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}
