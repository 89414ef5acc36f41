//! External generative-model collaborator for the AskMe backend.
//!
//! The gateway only sees the [`ModelClient`] trait; [`GeminiClient`] is the
//! production backend over the Gemini `generateContent` HTTP API.

pub mod client;
pub mod config;
pub mod gemini;
pub mod prompt;

pub use client::ModelClient;
pub use config::ModelConfig;
pub use gemini::GeminiClient;
