//! Pure quota arithmetic, kept apart from storage so the ceiling can change
//! (or become per-tier) without touching the store.
//!
//! The quota is advisory: the store never refuses an append on its own, the
//! calling layer turns `can_query == false` into a user-visible rejection.

/// Returns true if a session with `query_count` accepted user messages may
/// issue another query. A session accepts up to and including `max_queries`
/// user messages; the one after is refused.
pub fn can_query(query_count: u32, max_queries: u32) -> bool {
    query_count < max_queries
}

/// Queries left before the ceiling. Never underflows.
pub fn remaining_queries(query_count: u32, max_queries: u32) -> u32 {
    max_queries.saturating_sub(query_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_has_full_quota() {
        assert!(can_query(0, 5));
        assert_eq!(remaining_queries(0, 5), 5);
    }

    #[test]
    fn test_blocks_at_ceiling() {
        assert!(can_query(4, 5));
        assert!(!can_query(5, 5));
        assert_eq!(remaining_queries(5, 5), 0);
    }

    #[test]
    fn test_remaining_never_underflows() {
        // The store keeps counting past the ceiling (quota is advisory).
        assert_eq!(remaining_queries(9, 5), 0);
        assert!(!can_query(9, 5));
    }
}
