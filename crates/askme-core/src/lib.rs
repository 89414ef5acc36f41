//! Core types and error definitions for the AskMe backend.
//!
//! This crate provides the foundational types shared across all AskMe crates,
//! including error handling and the conversation message representation.
//!
//! # Main types
//!
//! - [`AskMeError`] — Unified error enum for all AskMe subsystems.
//! - [`AskMeResult`] — Convenience alias for `Result<T, AskMeError>`.
//! - [`Role`] — Message role (user or assistant).
//! - [`Message`] — A single turn within a conversation session.

mod error;
mod message;

pub use error::{AskMeError, AskMeResult};
pub use message::{Message, Role};
