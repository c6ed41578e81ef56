/// Pairing-phase transitions.
///
/// One decision consumes the current pair, records its winner and loser, and
/// either advances to the next pair in the round's pool or closes the round.
/// A closed round pushes a `RoundRecord` onto the recursion stack; the round
/// reduction repeats on the winners until a single champion remains, at which
/// point control passes to the insertion engine.
use crate::error::SortError;
use crate::insertion;
use crate::types::{ComparisonPair, PairingMap, PairingState, RoundRecord, SortState};

/// Apply one decision while in the pairing phase.
pub(crate) fn apply(state: &PairingState, winner_id: &str) -> Result<SortState, SortError> {
    let pair = &state.current_pair;
    if !pair.contains(winner_id) {
        return Err(SortError::UnknownDecision {
            id: winner_id.to_string(),
        });
    }

    let (winner, loser) = if pair.left.id == winner_id {
        (pair.left.clone(), pair.right.clone())
    } else {
        (pair.right.clone(), pair.left.clone())
    };

    let mut winners = state.round_winners.clone();
    let mut losers = state.round_losers.clone();
    let mut pairings = state.round_pairings.clone();
    pairings.insert(loser.id.clone(), winner.id.clone());
    winners.push(winner);
    losers.push(loser);

    // More unpaired items in this round: present the next two.
    if state.pool.len() >= 2 {
        let mut pool = state.pool.clone();
        let left = pool.remove(0);
        let right = pool.remove(0);
        return Ok(SortState::Pairing(PairingState {
            recursion_stack: state.recursion_stack.clone(),
            pool,
            round_winners: winners,
            round_losers: losers,
            round_pairings: pairings,
            odd_item: state.odd_item.clone(),
            current_pair: ComparisonPair { left, right },
        }));
    }

    // Round complete: summarize it, then either re-pair the winners or hand
    // the lone champion to the insertion engine.
    let mut stack = state.recursion_stack.clone();
    stack.push(RoundRecord {
        round: stack.len(),
        losers,
        odd_item: state.odd_item.clone(),
        pairings,
        promoted_winners: winners.clone(),
    });

    if winners.len() == 1 {
        return insertion::begin(winners, stack);
    }

    let mut next_pool = winners;
    // Winners accumulate in discovery order, so an odd-sized pool sheds its
    // last element positionally, not by strength.
    let odd_item = if next_pool.len() % 2 != 0 {
        next_pool.pop()
    } else {
        None
    };
    let left = next_pool.remove(0);
    let right = next_pool.remove(0);

    Ok(SortState::Pairing(PairingState {
        recursion_stack: stack,
        pool: next_pool,
        round_winners: Vec::new(),
        round_losers: Vec::new(),
        round_pairings: PairingMap::new(),
        odd_item,
        current_pair: ComparisonPair { left, right },
    }))
}
