/// Session initializer and decision dispatcher.
///
/// The engine is externally paced: it presents exactly one comparison, then
/// suspends until the caller routes a decision back through
/// `apply_decision`. Every call completes synchronously and yields a fresh
/// immutable state; the caller persists it before presenting the next pair,
/// so a session survives arbitrary gaps (including process restarts) between
/// comparisons.
use crate::error::SortError;
use crate::types::{
    ComparisonPair, CompletedState, Item, PairingMap, PairingState, SortState,
};
use crate::{insertion, pairing};

/// Build the starting state for a collection of items. Input order does not
/// matter. Zero or one item is already terminal; otherwise the first pairing
/// round opens with the first two items.
pub fn start_session(items: &[Item]) -> SortState {
    match items.len() {
        0 => SortState::Completed(CompletedState {
            main_chain: Vec::new(),
        }),
        1 => SortState::Completed(CompletedState {
            main_chain: items.to_vec(),
        }),
        _ => {
            let mut pool = items.to_vec();
            let odd_item = if pool.len() % 2 != 0 { pool.pop() } else { None };
            let left = pool.remove(0);
            let right = pool.remove(0);
            SortState::Pairing(PairingState {
                recursion_stack: Vec::new(),
                pool,
                round_winners: Vec::new(),
                round_losers: Vec::new(),
                round_pairings: PairingMap::new(),
                odd_item,
                current_pair: ComparisonPair { left, right },
            })
        }
    }
}

/// Route one decision to the engine for the current phase and return the
/// next state. `winner_id` must name one of the two items in the current
/// pair. A terminal state passes through unchanged.
///
/// This is the only mutation entry point; the input state is never touched,
/// so on `Err` the caller can retry against it or reload a persisted copy.
pub fn apply_decision(state: &SortState, winner_id: &str) -> Result<SortState, SortError> {
    match state {
        SortState::Pairing(p) => pairing::apply(p, winner_id),
        SortState::Insertion(i) => insertion::apply(i, winner_id),
        SortState::Completed(_) => Ok(state.clone()),
    }
}

/// Upper bound on the number of comparisons a session of `n` items can ask.
///
/// Replays the round structure without any decisions: pairing costs are
/// outcome-independent, and each insertion asks at most
/// ceil(log2(chain_len + 1)) questions. Useful for progress display.
pub fn worst_case_comparisons(n: usize) -> usize {
    if n < 2 {
        return 0;
    }

    // Per round: m items pair into m/2 comparisons; the losers plus any odd
    // leftover come back later as one insertion group.
    let mut total = 0;
    let mut group_sizes: Vec<usize> = Vec::new();
    let mut m = n;
    loop {
        let pairs = m / 2;
        total += pairs;
        group_sizes.push(pairs + m % 2);
        if pairs == 1 {
            break;
        }
        m = pairs;
    }

    // Insertion replays the stack innermost-first; the chain starts at the
    // lone champion and grows by one per placed item.
    let mut chain = 1usize;
    for &size in group_sizes.iter().rev() {
        for _ in 0..size {
            total += ceil_log2(chain + 1);
            chain += 1;
        }
    }
    total
}

fn ceil_log2(x: usize) -> usize {
    debug_assert!(x > 0);
    (usize::BITS - (x - 1).leading_zeros()) as usize
}
