// Completion & Next-Person Selection - the core state machine
//
// States of a queue entry: PENDING (waiting, position >= 1) -> serving
// (position 1, selected as next) -> COMPLETED (position 0, out of the
// index). Transitions are one-directional.

use super::select::{renumber, select_next};
use super::QueueEngine;
use crate::domain::{Token, UserId, WorkStatus};
use crate::error::{AppError, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of a completion cycle
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    /// User now being served, when one was selected
    pub serving: Option<UserId>,
    pub message: String,
}

impl QueueEngine {
    /// Complete a user's work and advance the queue.
    ///
    /// The handoff delay deliberately blocks this request (not the index):
    /// in-flight location updates from waiting users land before the
    /// remainder is ranked, and other issuances/completions proceed
    /// meanwhile. The index is therefore snapshotted fresh after the wait.
    pub async fn complete_and_advance(&self, user_id: UserId) -> Result<AdvanceOutcome> {
        let token = self
            .token_repo
            .find_latest_by_user(user_id)
            .await?
            .filter(|t| t.work_status == WorkStatus::Pending)
            .ok_or_else(|| AppError::NotFound("User not found in the queue".to_string()))?;

        let scope = (token.service_id, token.counter_id);

        self.token_repo.mark_completed(user_id).await?;
        let removed = self.index.remove(scope, user_id).await;
        if !removed {
            // Row said pending but the index disagreed; the removal is a
            // no-op and the cycle continues against the live index.
            warn!(user_id, "Completed user was not in the queue index");
        }

        info!(user_id, "User completed, entering handoff delay");
        tokio::time::sleep(self.config.handoff_delay).await;

        // Fresh snapshot: the index may have changed during the wait
        let remaining = self.index.snapshot(scope).await;
        if remaining.is_empty() {
            return Ok(AdvanceOutcome {
                serving: None,
                message: format!("User {} marked completed; queue is empty.", user_id),
            });
        }

        let tokens = self.pending_tokens_in_order(&remaining).await?;
        let outcome = match select_next(&tokens) {
            Some(next_user) => {
                // Selected user moves to the front so positions equal index
                // ranks again after renumbering
                let order = self.index.promote_to_front(scope, next_user).await;
                self.token_repo
                    .assign_positions(&renumber(&order))
                    .await?;

                info!(user_id = next_user, "Next user selected for service");
                AdvanceOutcome {
                    serving: Some(next_user),
                    message: format!("User {} is now being served.", next_user),
                }
            }
            None => {
                // Snapshot ids had no pending tokens left; renumber whatever
                // order remains
                let order = self.index.snapshot(scope).await;
                self.token_repo
                    .assign_positions(&renumber(&order))
                    .await?;
                AdvanceOutcome {
                    serving: None,
                    message: format!("User {} marked completed and queue rearranged.", user_id),
                }
            }
        };

        Ok(outcome)
    }

    /// Pending tokens for the snapshot ids, kept in snapshot order so ties
    /// resolve deterministically
    async fn pending_tokens_in_order(&self, snapshot: &[UserId]) -> Result<Vec<Token>> {
        let tokens = self.token_repo.find_pending_by_users(snapshot).await?;
        let mut ordered = Vec::with_capacity(tokens.len());
        for user_id in snapshot {
            if let Some(token) = tokens.iter().find(|t| t.user_id == *user_id) {
                ordered.push(token.clone());
            }
        }
        Ok(ordered)
    }
}
