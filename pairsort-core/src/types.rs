/// Core data model for the merge-insertion state machine.
///
/// The sort state is a tagged union over the three phases. Each variant
/// carries only the fields that phase uses, so a deserialized state can never
/// claim to be mid-insertion without a binary-search cursor, or mid-pairing
/// without an open pair.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An item being sorted. The engine only ever looks at `id`; everything else
/// is display metadata carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// The one open question: two items awaiting a verdict from the decision
/// provider. Exactly one pair exists at any non-terminal instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPair {
    pub left: Item,
    pub right: Item,
}

impl ComparisonPair {
    /// Whether `id` names one of the two presented items.
    pub fn contains(&self, id: &str) -> bool {
        self.left.id == id || self.right.id == id
    }
}

/// Loser id → winner id, accumulated during one pairing round.
pub type PairingMap = BTreeMap<String, String>;

/// Summary of one completed pairing round, pushed onto the recursion stack.
/// Immutable once created; popped again (last-in-first-out) when its losers
/// are due for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    /// Losers in the order they lost.
    pub losers: Vec<Item>,
    /// The item left unpaired when this round's pool had odd size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd_item: Option<Item>,
    #[serde(with = "crate::serialize::tagged_map")]
    pub pairings: PairingMap,
    /// The winners this round promoted to the next round.
    pub promoted_winners: Vec<Item>,
}

/// In-progress binary search for where `target` belongs in the main chain.
/// `[min, max)` is the candidate insertion index range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearchCursor {
    pub target: Item,
    pub min: usize,
    pub max: usize,
}

impl BinarySearchCursor {
    /// The chain index the target is currently being compared against.
    pub fn mid(&self) -> usize {
        (self.min + self.max) / 2
    }
}

/// Phase discriminant, for callers that only care where the machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pairing,
    Insertion,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Pairing => "PAIRING",
            Phase::Insertion => "INSERTION",
            Phase::Completed => "COMPLETED",
        };
        write!(f, "{s}")
    }
}

/// Working data while a pairing round is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingState {
    pub recursion_stack: Vec<RoundRecord>,
    /// Items of this round not yet paired.
    pub pool: Vec<Item>,
    /// Winners so far this round, in discovery order.
    pub round_winners: Vec<Item>,
    /// Losers so far this round, in discovery order.
    pub round_losers: Vec<Item>,
    #[serde(with = "crate::serialize::tagged_map")]
    pub round_pairings: PairingMap,
    /// The unpaired straggler when this round's pool had odd size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd_item: Option<Item>,
    pub current_pair: ComparisonPair,
}

/// Working data while a loser is being binary-searched into the main chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionState {
    /// The chain under construction, ordered weakest first; the overall
    /// champion sits at the end. Sorted at every step, not just at the end.
    pub main_chain: Vec<Item>,
    pub recursion_stack: Vec<RoundRecord>,
    /// Items of the current popped round still awaiting insertion, already
    /// permuted into Jacobsthal order. Consumed from the front.
    pub group: Vec<Item>,
    pub cursor: BinarySearchCursor,
    pub current_pair: ComparisonPair,
}

/// Terminal payload: every item has been placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedState {
    pub main_chain: Vec<Item>,
}

/// The whole machine state. One value of this type crosses every suspension
/// point; it round-trips through `serialize_state` / `deserialize_state` with
/// no other context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase")]
pub enum SortState {
    #[serde(rename = "PAIRING")]
    Pairing(PairingState),
    #[serde(rename = "INSERTION")]
    Insertion(InsertionState),
    #[serde(rename = "COMPLETED")]
    Completed(CompletedState),
}

impl SortState {
    pub fn phase(&self) -> Phase {
        match self {
            SortState::Pairing(_) => Phase::Pairing,
            SortState::Insertion(_) => Phase::Insertion,
            SortState::Completed(_) => Phase::Completed,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SortState::Completed(_))
    }

    /// The pair currently awaiting a decision, or `None` once terminal.
    pub fn current_pair(&self) -> Option<&ComparisonPair> {
        match self {
            SortState::Pairing(p) => Some(&p.current_pair),
            SortState::Insertion(i) => Some(&i.current_pair),
            SortState::Completed(_) => None,
        }
    }

    /// The main chain as stored (weakest first). `None` during pairing, when
    /// no chain exists yet.
    pub fn main_chain(&self) -> Option<&[Item]> {
        match self {
            SortState::Pairing(_) => None,
            SortState::Insertion(i) => Some(&i.main_chain),
            SortState::Completed(c) => Some(&c.main_chain),
        }
    }

    /// Final ranking, most-preferred first. `None` until the sort completes.
    pub fn ranking(&self) -> Option<Vec<Item>> {
        match self {
            SortState::Completed(c) => Some(c.main_chain.iter().rev().cloned().collect()),
            _ => None,
        }
    }

    /// `(placed, total)`: how many items sit in the main chain versus how
    /// many the session is sorting overall.
    pub fn progress(&self) -> (usize, usize) {
        let stack_items = |stack: &[RoundRecord]| -> usize {
            stack
                .iter()
                .map(|r| r.losers.len() + usize::from(r.odd_item.is_some()))
                .sum()
        };
        match self {
            SortState::Pairing(p) => {
                let total = stack_items(&p.recursion_stack)
                    + p.pool.len()
                    + p.round_winners.len()
                    + p.round_losers.len()
                    + usize::from(p.odd_item.is_some())
                    + 2;
                (0, total)
            }
            SortState::Insertion(i) => {
                let total =
                    stack_items(&i.recursion_stack) + i.main_chain.len() + i.group.len() + 1;
                (i.main_chain.len(), total)
            }
            SortState::Completed(c) => (c.main_chain.len(), c.main_chain.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_contains() {
        let pair = ComparisonPair {
            left: Item::new("a", "Apple"),
            right: Item::new("b", "Banana"),
        };
        assert!(pair.contains("a"));
        assert!(pair.contains("b"));
        assert!(!pair.contains("c"));
    }

    #[test]
    fn test_cursor_mid() {
        let cursor = BinarySearchCursor {
            target: Item::new("x", "X"),
            min: 0,
            max: 5,
        };
        assert_eq!(cursor.mid(), 2);

        let cursor = BinarySearchCursor {
            target: Item::new("x", "X"),
            min: 3,
            max: 4,
        };
        assert_eq!(cursor.mid(), 3);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Pairing.to_string(), "PAIRING");
        assert_eq!(Phase::Insertion.to_string(), "INSERTION");
        assert_eq!(Phase::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn test_item_with_detail() {
        let item = Item::new("1", "So What").with_detail("Miles Davis");
        assert_eq!(item.detail.as_deref(), Some("Miles Davis"));
    }
}
