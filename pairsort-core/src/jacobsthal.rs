//! Jacobsthal-ordered batch insertion.
//!
//! When a round's losers come up for insertion, inserting them left-to-right
//! wastes comparisons: the binary-search ranges grow as the chain grows.
//! Merge-insertion instead jumps ahead to the Jacobsthal number positions
//! (J(0)=0, J(1)=1, J(k)=J(k-1)+2·J(k-2): 0, 1, 1, 3, 5, 11, 21, ...) and
//! walks back down, which keeps every search range at a power-of-two-minus-one
//! width and the worst-case comparison count near the information-theoretic
//! bound.

/// The order in which a batch of `n` pending items should be inserted.
///
/// Returns a permutation of `[0, n)`: index 0 first, then for each Jacobsthal
/// number J(k) (k >= 3) the indices from J(k)-1 down to J(k-1), clamped into
/// range and skipping anything already emitted.
///
/// `insertion_order(3)` is `[0, 2, 1]`; `insertion_order(5)` is
/// `[0, 2, 1, 4, 3]`.
pub fn insertion_order(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mut order = Vec::with_capacity(n);
    order.push(0usize);

    // prev = J(k-1), prev_prev = J(k-2), starting at k = 3.
    let mut prev_prev: usize = 1;
    let mut prev: usize = 1;

    while order.len() < n {
        let curr = prev + 2 * prev_prev;

        let mut i = (curr - 1).min(n - 1);
        while i >= prev {
            if !order.contains(&i) {
                order.push(i);
            }
            if i == 0 {
                break;
            }
            i -= 1;
        }

        prev_prev = prev;
        prev = curr;
    }

    order
}
