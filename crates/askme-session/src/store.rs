use crate::clock::{Clock, SystemClock};
use crate::quota;
use crate::session::Session;
use askme_core::{Message, Role};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Default idle timeout before a session is considered expired: 1 hour.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::hours(1);

/// Default bound on retained messages per session.
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Default user-query ceiling per session.
pub const DEFAULT_MAX_QUERIES: u32 = 5;

/// Tunables for the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle time after which a session is logically absent.
    pub timeout: Duration,
    /// Maximum retained messages per session (oldest dropped first).
    pub max_history: usize,
    /// User-query ceiling stamped onto each session at creation.
    pub max_queries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SESSION_TIMEOUT,
            max_history: DEFAULT_MAX_HISTORY,
            max_queries: DEFAULT_MAX_QUERIES,
        }
    }
}

/// Recoverable outcome of operations that target a specific session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session is absent or idle past the timeout. Callers typically
    /// respond by creating a fresh session.
    #[error("session not found or expired")]
    NotFound,
}

/// Concurrency-safe in-memory store of conversation sessions.
///
/// All operations are short, non-suspending critical sections over a sharded
/// map, so the store can be shared freely between request tasks and the
/// sweeper without external locking. Mutations of a given session id are
/// serialized by the map's per-shard locks; no ordering is guaranteed across
/// different sessions.
///
/// Expiry is enforced twice: lazily by every lookup, and in batch by
/// [`sweep_expired`](Self::sweep_expired). Both paths go through the same
/// atomic check-and-remove, so a session racing both observers is removed
/// exactly once and neither path can see it mid-deletion.
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    next_sequence: AtomicU64,
}

impl SessionStore {
    /// Creates a store on the system clock.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock. For tests that drive expiry.
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
            clock,
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Allocates a fresh session with empty history and full quota.
    ///
    /// Ids are v4 UUIDs; collision over a process lifetime is negligible and
    /// ids are never reused after deletion.
    pub fn create(&self) -> Uuid {
        let now = self.clock.now();
        let id = Uuid::new_v4();
        self.sessions
            .insert(id, Session::new(id, now, self.config.max_queries));
        id
    }

    /// Returns a snapshot of the session, or `None` if it is absent or
    /// expired. An expired session is removed as a side effect.
    pub fn get(&self, id: Uuid) -> Option<Session> {
        let now = self.clock.now();
        self.evict_if_expired(id, now);
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Appends a message to the session, enforcing the history bound and
    /// refreshing activity. The single mutation entry point.
    ///
    /// Quota is *not* checked here; the store accepts user messages past the
    /// ceiling and keeps counting. Enforcement belongs to the caller via
    /// [`can_query`](Self::can_query).
    pub fn append_message(
        &self,
        id: Uuid,
        text: impl Into<String>,
        role: Role,
    ) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.evict_if_expired(id, now);
        let mut entry = self.sessions.get_mut(&id).ok_or(SessionError::NotFound)?;
        let sequence_id = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let message = Message::new(sequence_id, role, text, now);
        entry.push(message, self.config.max_history, now);
        Ok(())
    }

    /// Returns the bounded history in insertion order, or an empty vec if
    /// the session is absent or expired. Never an error: callers treat "no
    /// session" and "empty session" identically for reads.
    pub fn history(&self, id: Uuid) -> Vec<Message> {
        let now = self.clock.now();
        self.evict_if_expired(id, now);
        self.sessions
            .get(&id)
            .map(|entry| entry.messages.clone())
            .unwrap_or_default()
    }

    /// Queries left before the ceiling; 0 for an absent or expired session.
    pub fn remaining_queries(&self, id: Uuid) -> u32 {
        let now = self.clock.now();
        self.evict_if_expired(id, now);
        self.sessions
            .get(&id)
            .map(|entry| quota::remaining_queries(entry.query_count, entry.max_queries))
            .unwrap_or(0)
    }

    /// True iff the session exists, is not expired, and has quota left.
    pub fn can_query(&self, id: Uuid) -> bool {
        let now = self.clock.now();
        self.evict_if_expired(id, now);
        self.sessions
            .get(&id)
            .map(|entry| quota::can_query(entry.query_count, entry.max_queries))
            .unwrap_or(false)
    }

    /// Removes every session idle past the timeout; returns how many were
    /// removed. Safe to run concurrently with any other operation.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let candidates: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.is_expired(now, self.config.timeout))
            .map(|entry| *entry.key())
            .collect();

        // Re-check under the entry lock: a concurrent lazy eviction may have
        // beaten us to any of these, and each must count at most once.
        candidates
            .into_iter()
            .filter(|id| self.evict_if_expired(*id, now))
            .count()
    }

    /// Number of sessions physically present (including any expired ones
    /// still pending sweep).
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// The single expire-if-stale primitive shared by lazy lookups and the
    /// sweeper. Returns true if this call removed the session.
    fn evict_if_expired(&self, id: Uuid, now: DateTime<Utc>) -> bool {
        self.sessions
            .remove_if(&id, |_, session| {
                session.is_expired(now, self.config.timeout)
            })
            .is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_create_inserts_fresh_session() {
        let store = SessionStore::new(SessionConfig::default());
        let id = store.create();
        let session = store.get(id).unwrap();
        assert_eq!(session.id, id);
        assert!(session.messages.is_empty());
        assert_eq!(session.query_count, 0);
        assert_eq!(session.max_queries, DEFAULT_MAX_QUERIES);
        assert_eq!(session.created_at, session.last_activity_at);
    }

    #[test]
    fn test_get_unknown_id_is_absent() {
        let store = SessionStore::new(SessionConfig::default());
        assert!(store.get(Uuid::new_v4()).is_none());
        assert!(!store.can_query(Uuid::new_v4()));
        assert_eq!(store.remaining_queries(Uuid::new_v4()), 0);
        assert!(store.history(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_append_to_unknown_id_reports_not_found() {
        let store = SessionStore::new(SessionConfig::default());
        let err = store
            .append_message(Uuid::new_v4(), "hello", Role::User)
            .unwrap_err();
        assert_eq!(err, SessionError::NotFound);
    }

    #[test]
    fn test_sequence_ids_are_monotonic() {
        let store = SessionStore::new(SessionConfig::default());
        let id = store.create();
        store.append_message(id, "a", Role::User).unwrap();
        store.append_message(id, "b", Role::Assistant).unwrap();
        store.append_message(id, "c", Role::User).unwrap();
        let history = store.history(id);
        assert!(history.windows(2).all(|w| w[0].sequence_id < w[1].sequence_id));
    }

    #[test]
    fn test_lazy_eviction_removes_physically() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = SessionStore::with_clock(SessionConfig::default(), clock.clone());
        let id = store.create();
        clock.advance(DEFAULT_SESSION_TIMEOUT + Duration::seconds(1));
        assert!(store.get(id).is_none());
        assert_eq!(store.active_sessions(), 0);
    }
}
