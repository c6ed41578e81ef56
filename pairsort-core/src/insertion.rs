/// Insertion-phase transitions.
///
/// Two nested loops, both externally paced: drain the current insertion
/// group one item at a time, and when it empties, pop the next round off the
/// recursion stack to build a new group. The stack pops last-in-first-out,
/// so the innermost (smallest) round's losers merge into the nascent chain
/// before any larger round's losers are considered.
///
/// Each item is placed by a binary search whose comparisons are answered by
/// the decision provider. The search always spans the whole current chain
/// rather than stopping at the item's pairing-phase winner; that costs a few
/// comparisons over the Ford-Johnson optimum but stays a correct sort, and
/// the per-loser search ceilings are deliberately not carried across rounds.
use crate::error::SortError;
use crate::jacobsthal::insertion_order;
use crate::types::{
    BinarySearchCursor, ComparisonPair, CompletedState, InsertionState, Item, RoundRecord,
    SortState,
};

/// Apply one decision while in the insertion phase: narrow the binary search
/// and, once the range closes, splice the target into the chain.
pub(crate) fn apply(state: &InsertionState, winner_id: &str) -> Result<SortState, SortError> {
    let pair = &state.current_pair;
    if !pair.contains(winner_id) {
        return Err(SortError::UnknownDecision {
            id: winner_id.to_string(),
        });
    }

    let cursor = &state.cursor;
    if cursor.min >= cursor.max || cursor.max > state.main_chain.len() {
        return Err(SortError::InvalidState {
            reason: format!(
                "binary search range [{}, {}) is unusable for a chain of {}",
                cursor.min,
                cursor.max,
                state.main_chain.len()
            ),
        });
    }

    let mid = cursor.mid();
    let target_wins = cursor.target.id == winner_id;
    // Winner goes later in the chain: the chain is ordered weakest first.
    let (min, max) = if target_wins {
        (mid + 1, cursor.max)
    } else {
        (cursor.min, mid)
    };

    if min < max {
        let cursor = BinarySearchCursor {
            target: cursor.target.clone(),
            min,
            max,
        };
        let opponent = chain_item(&state.main_chain, cursor.mid())?;
        return Ok(SortState::Insertion(InsertionState {
            main_chain: state.main_chain.clone(),
            recursion_stack: state.recursion_stack.clone(),
            group: state.group.clone(),
            current_pair: ComparisonPair {
                left: cursor.target.clone(),
                right: opponent,
            },
            cursor,
        }));
    }

    // Range closed: min is the insertion index.
    let mut chain = state.main_chain.clone();
    chain.insert(min, cursor.target.clone());
    advance(chain, state.recursion_stack.clone(), state.group.clone())
}

/// Entry point from the pairing engine: the champion seeds the chain, and the
/// first insertion target is computed from the top of the stack.
pub(crate) fn begin(
    main_chain: Vec<Item>,
    recursion_stack: Vec<RoundRecord>,
) -> Result<SortState, SortError> {
    advance(main_chain, recursion_stack, Vec::new())
}

/// Move to the next insertion target, popping rounds off the stack as groups
/// empty. Terminal once both the group and the stack are exhausted.
fn advance(
    main_chain: Vec<Item>,
    mut recursion_stack: Vec<RoundRecord>,
    mut group: Vec<Item>,
) -> Result<SortState, SortError> {
    loop {
        if !group.is_empty() {
            let target = group.remove(0);
            let cursor = BinarySearchCursor {
                target: target.clone(),
                min: 0,
                max: main_chain.len(),
            };
            let opponent = chain_item(&main_chain, cursor.mid())?;
            return Ok(SortState::Insertion(InsertionState {
                current_pair: ComparisonPair {
                    left: target,
                    right: opponent,
                },
                main_chain,
                recursion_stack,
                group,
                cursor,
            }));
        }

        let Some(record) = recursion_stack.pop() else {
            return Ok(SortState::Completed(CompletedState { main_chain }));
        };

        // Pending items: the round's losers, then its odd leftover. Permute
        // into Jacobsthal order before queueing.
        let mut pending = record.losers;
        if let Some(odd) = record.odd_item {
            pending.push(odd);
        }
        group = insertion_order(pending.len())
            .into_iter()
            .map(|i| pending[i].clone())
            .collect();
    }
}

fn chain_item(main_chain: &[Item], idx: usize) -> Result<Item, SortError> {
    main_chain
        .get(idx)
        .cloned()
        .ok_or_else(|| SortError::InvalidState {
            reason: format!(
                "chain index {idx} out of bounds for a chain of {}",
                main_chain.len()
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PairingMap;

    fn item(n: usize) -> Item {
        Item::new(format!("id_{n}"), format!("Item {n}"))
    }

    fn record(losers: Vec<Item>, odd_item: Option<Item>) -> RoundRecord {
        RoundRecord {
            round: 0,
            losers,
            odd_item,
            pairings: PairingMap::new(),
            promoted_winners: Vec::new(),
        }
    }

    #[test]
    fn test_begin_with_empty_stack_is_terminal() {
        let state = begin(vec![item(1)], Vec::new()).unwrap();
        let SortState::Completed(done) = state else {
            panic!("expected completed state");
        };
        assert_eq!(done.main_chain.len(), 1);
    }

    #[test]
    fn test_begin_presents_midpoint_comparison() {
        let chain = vec![item(1)];
        let state = begin(chain, vec![record(vec![item(2)], None)]).unwrap();

        let SortState::Insertion(ins) = state else {
            panic!("expected insertion state");
        };
        assert_eq!(ins.cursor.target.id, "id_2");
        assert_eq!((ins.cursor.min, ins.cursor.max), (0, 1));
        assert_eq!(ins.current_pair.left.id, "id_2");
        assert_eq!(ins.current_pair.right.id, "id_1");
        assert!(ins.group.is_empty());
        assert!(ins.recursion_stack.is_empty());
    }

    #[test]
    fn test_group_built_in_jacobsthal_order() {
        // Three pending (two losers + odd): order [0, 2, 1].
        let chain = vec![item(1)];
        let state = begin(
            chain,
            vec![record(vec![item(2), item(3)], Some(item(4)))],
        )
        .unwrap();

        let SortState::Insertion(ins) = state else {
            panic!()
        };
        assert_eq!(ins.cursor.target.id, "id_2");
        let queued: Vec<&str> = ins.group.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(queued, vec!["id_4", "id_3"]);
    }

    #[test]
    fn test_target_loss_inserts_before_opponent() {
        let state = begin(vec![item(1)], vec![record(vec![item(2)], None)]).unwrap();
        let SortState::Insertion(ins) = &state else {
            panic!()
        };

        // Chain item id_1 wins: id_2 lands before it, weakest first.
        let next = apply(ins, "id_1").unwrap();
        let SortState::Completed(done) = next else {
            panic!("expected completed state");
        };
        let ids: Vec<&str> = done.main_chain.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["id_2", "id_1"]);
    }

    #[test]
    fn test_target_win_inserts_after_opponent() {
        let state = begin(vec![item(1)], vec![record(vec![item(2)], None)]).unwrap();
        let SortState::Insertion(ins) = &state else {
            panic!()
        };

        let next = apply(ins, "id_2").unwrap();
        let SortState::Completed(done) = next else {
            panic!("expected completed state");
        };
        let ids: Vec<&str> = done.main_chain.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["id_1", "id_2"]);
    }

    #[test]
    fn test_search_narrows_before_inserting() {
        // Chain of three, target compared at mid = 1 first.
        let chain = vec![item(1), item(2), item(3)];
        let state = begin(chain, vec![record(vec![item(4)], None)]).unwrap();
        let SortState::Insertion(ins) = &state else {
            panic!()
        };
        assert_eq!(ins.current_pair.right.id, "id_2");

        // Target wins at mid 1: range becomes [2, 3), next opponent id_3.
        let state = apply(ins, "id_4").unwrap();
        let SortState::Insertion(ins) = &state else {
            panic!("search should continue");
        };
        assert_eq!((ins.cursor.min, ins.cursor.max), (2, 3));
        assert_eq!(ins.current_pair.right.id, "id_3");

        // Target loses at mid 2: insert at index 2.
        let state = apply(ins, "id_3").unwrap();
        let SortState::Completed(done) = state else {
            panic!("expected completed state");
        };
        let ids: Vec<&str> = done.main_chain.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["id_1", "id_2", "id_4", "id_3"]);
    }

    #[test]
    fn test_corrupt_cursor_is_rejected() {
        let state = begin(vec![item(1)], vec![record(vec![item(2)], None)]).unwrap();
        let SortState::Insertion(ins) = state else {
            panic!()
        };

        let mut corrupt = ins.clone();
        corrupt.cursor.max = 99;
        let err = apply(&corrupt, "id_1").unwrap_err();
        assert!(matches!(err, SortError::InvalidState { .. }));

        let mut corrupt = ins;
        corrupt.cursor.min = corrupt.cursor.max;
        let err = apply(&corrupt, "id_1").unwrap_err();
        assert!(matches!(err, SortError::InvalidState { .. }));
    }

    #[test]
    fn test_empty_rounds_pop_through_to_terminal() {
        // Records with no pending items never present a comparison.
        let state = begin(
            vec![item(1)],
            vec![record(Vec::new(), None), record(Vec::new(), None)],
        )
        .unwrap();
        assert!(state.is_complete());
    }
}
