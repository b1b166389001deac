// Next-user selection and position renumbering
//
// Pure functions over a snapshot of pending tokens, kept separate from the
// orchestration so the ranking policy is testable without storage.

use crate::domain::{Token, UserId};

/// Pick the next user to serve: minimum distance, ties broken by minimum
/// duration, remaining ties by snapshot order. None when the snapshot is
/// empty.
pub fn select_next(tokens: &[Token]) -> Option<UserId> {
    tokens
        .iter()
        .min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.duration.cmp(&b.duration))
        })
        .map(|token| token.user_id)
}

/// 1-based positions for the given queue order
pub fn renumber(order: &[UserId]) -> Vec<(UserId, i64)> {
    order
        .iter()
        .enumerate()
        .map(|(idx, user_id)| (*user_id, idx as i64 + 1))
        .collect()
}
