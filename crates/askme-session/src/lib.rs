//! Session lifecycle management for the AskMe backend.
//!
//! Owns the in-memory mapping from session id to conversation state:
//! creation, lookup with lazy expiry, bounded message history, per-session
//! query quotas, and the background sweeper that reclaims idle sessions.
//!
//! The store is purely in-memory; state does not survive a process restart.

pub mod clock;
pub mod quota;
pub mod session;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::Session;
pub use store::{SessionConfig, SessionError, SessionStore};
pub use sweeper::Sweeper;
