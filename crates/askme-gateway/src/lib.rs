//! HTTP surface of the AskMe backend: chat, session, history, and health
//! routes over the session store and the model client.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, GatewayServer};
