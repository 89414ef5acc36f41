use crate::quota;
use askme_core::Message;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A bounded-lifetime conversational context keyed by an opaque id.
///
/// Sessions are owned by the [`SessionStore`](crate::SessionStore) and only
/// mutated through it; values handed out to callers are snapshots.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque unique identifier, generated at creation. Never reused.
    pub id: Uuid,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every accepted message append.
    pub last_activity_at: DateTime<Utc>,
    /// Most recent messages in insertion order, FIFO-truncated to the
    /// store's history bound.
    pub messages: Vec<Message>,
    /// Count of user-originated messages accepted so far. Never decreases,
    /// and keeps counting past the quota ceiling.
    pub query_count: u32,
    /// Quota ceiling fixed at creation from store configuration.
    pub max_queries: u32,
}

impl Session {
    pub(crate) fn new(id: Uuid, now: DateTime<Utc>, max_queries: u32) -> Self {
        Self {
            id,
            created_at: now,
            last_activity_at: now,
            messages: Vec::new(),
            query_count: 0,
            max_queries,
        }
    }

    /// Returns true if the session has been idle longer than `timeout`.
    ///
    /// An expired session is logically absent: lookups treat it as
    /// nonexistent even while it is still physically present pending sweep.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_activity_at > timeout
    }

    /// True iff another user query is within quota.
    pub fn can_query(&self) -> bool {
        quota::can_query(self.query_count, self.max_queries)
    }

    /// Queries left before the ceiling.
    pub fn remaining_queries(&self) -> u32 {
        quota::remaining_queries(self.query_count, self.max_queries)
    }

    /// Appends a message, truncates history to `max_history`, bumps the
    /// query count for user turns, and refreshes the activity timestamp.
    pub(crate) fn push(&mut self, message: Message, max_history: usize, now: DateTime<Utc>) {
        if message.is_user() {
            self.query_count += 1;
        }
        self.messages.push(message);
        if self.messages.len() > max_history {
            let excess = self.messages.len() - max_history;
            self.messages.drain(..excess);
        }
        self.last_activity_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use askme_core::Role;

    fn push_text(session: &mut Session, seq: u64, role: Role, text: &str) {
        let now = Utc::now();
        session.push(Message::new(seq, role, text, now), 10, now);
    }

    #[test]
    fn test_history_truncates_oldest_first() {
        let mut session = Session::new(Uuid::new_v4(), Utc::now(), 5);
        for i in 0..15u64 {
            push_text(&mut session, i, Role::User, &format!("msg {i}"));
        }
        assert_eq!(session.messages.len(), 10);
        assert_eq!(session.messages[0].text, "msg 5");
        assert_eq!(session.messages[9].text, "msg 14");
    }

    #[test]
    fn test_query_count_only_counts_user_turns() {
        let mut session = Session::new(Uuid::new_v4(), Utc::now(), 5);
        push_text(&mut session, 0, Role::User, "hello");
        push_text(&mut session, 1, Role::Assistant, "hi");
        push_text(&mut session, 2, Role::User, "how are you?");
        assert_eq!(session.query_count, 2);
        assert_eq!(session.remaining_queries(), 3);
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let session = Session::new(Uuid::new_v4(), now, 5);
        let timeout = Duration::hours(1);
        assert!(!session.is_expired(now + timeout, timeout));
        assert!(session.is_expired(now + timeout + Duration::seconds(1), timeout));
    }

    #[test]
    fn test_push_refreshes_activity() {
        let t0 = Utc::now();
        let mut session = Session::new(Uuid::new_v4(), t0, 5);
        let t1 = t0 + Duration::minutes(30);
        session.push(Message::new(0, Role::User, "hi", t1), 10, t1);
        assert_eq!(session.last_activity_at, t1);
        assert_eq!(session.created_at, t0);
    }
}
