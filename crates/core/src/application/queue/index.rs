// Queue Index - ordered active membership, one list per (service, counter)
//
// The engine exclusively owns this structure. A single mutex serializes every
// index mutation; issuance additionally holds the guard across its storage
// transaction so concurrent issuances for one scope cannot compute the same
// position. The operational buffer in completion handling must never sleep
// while holding the guard.

use crate::domain::{CounterId, ServiceId, UserId};
use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

/// Queue scope: positions are numbered per (service, counter) pair
pub type Scope = (ServiceId, CounterId);

/// In-memory ordered index of waiting users, created at process start and
/// never implicitly reset
#[derive(Default)]
pub struct QueueIndex {
    inner: Mutex<HashMap<Scope, Vec<UserId>>>,
}

impl QueueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the index lock. Mutations through the guard are atomic with
    /// respect to every other index mutation.
    pub async fn guard(&self) -> QueueIndexGuard<'_> {
        QueueIndexGuard {
            map: self.inner.lock().await,
        }
    }

    /// Remove the first occurrence of `user_id` from the scope's list.
    /// Removing an absent id is a no-op; returns whether anything was removed.
    pub async fn remove(&self, scope: Scope, user_id: UserId) -> bool {
        self.guard().await.remove(scope, user_id)
    }

    /// Current order of the scope's list
    pub async fn snapshot(&self, scope: Scope) -> Vec<UserId> {
        self.guard().await.snapshot(scope)
    }

    /// Move `user_id` to the front of the scope's list and return the
    /// resulting order. No-op (order returned unchanged) when absent.
    pub async fn promote_to_front(&self, scope: Scope, user_id: UserId) -> Vec<UserId> {
        self.guard().await.promote_to_front(scope, user_id)
    }
}

/// Locked view over the index
pub struct QueueIndexGuard<'a> {
    map: MutexGuard<'a, HashMap<Scope, Vec<UserId>>>,
}

impl QueueIndexGuard<'_> {
    /// Append to the end of the scope's list (insertion order)
    pub fn append(&mut self, scope: Scope, user_id: UserId) {
        self.map.entry(scope).or_default().push(user_id);
    }

    pub fn remove(&mut self, scope: Scope, user_id: UserId) -> bool {
        match self.map.get_mut(&scope) {
            Some(queue) => match queue.iter().position(|id| *id == user_id) {
                Some(idx) => {
                    queue.remove(idx);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    pub fn snapshot(&self, scope: Scope) -> Vec<UserId> {
        self.map.get(&scope).cloned().unwrap_or_default()
    }

    pub fn promote_to_front(&mut self, scope: Scope, user_id: UserId) -> Vec<UserId> {
        if let Some(queue) = self.map.get_mut(&scope) {
            if let Some(idx) = queue.iter().position(|id| *id == user_id) {
                let id = queue.remove(idx);
                queue.insert(0, id);
            }
            queue.clone()
        } else {
            Vec::new()
        }
    }
}
