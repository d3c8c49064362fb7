// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session Genie conversation ids.

use std::sync::Arc;

use dashmap::DashMap;
use switchyard_core::{ConversationId, SessionId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Maps chat sessions to the Genie conversation that continues them.
///
/// Reads and writes are individually atomic. Callers that need
/// read-query-write to be atomic for one session hold
/// [`lock_session`](Self::lock_session) across the whole exchange; other
/// sessions are unaffected.
#[derive(Debug, Default)]
pub struct ConversationTracker {
    conversations: DashMap<SessionId, ConversationId>,
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl ConversationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session: &SessionId) -> Option<ConversationId> {
        self.conversations.get(session).map(|entry| entry.value().clone())
    }

    /// Record `conversation` for `session`, replacing any previous id.
    pub fn set(&self, session: &SessionId, conversation: ConversationId) {
        debug!(session = %session, conversation = %conversation, "tracking conversation");
        self.conversations.insert(session.clone(), conversation);
    }

    /// Forget the session's conversation so the next query starts fresh.
    /// Returns the id that was removed.
    pub fn clear(&self, session: &SessionId) -> Option<ConversationId> {
        let removed = self.conversations.remove(session).map(|(_, id)| id);
        self.release_lock(session);
        removed
    }

    /// Drop the session's lock entry if nobody holds or awaits it. The next
    /// [`lock_session`](Self::lock_session) recreates it.
    pub fn release_lock(&self, session: &SessionId) {
        self.locks
            .remove_if(session, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Exclusive access to one session until the guard drops.
    pub async fn lock_session(&self, session: &SessionId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session.clone())
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub(crate) fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
