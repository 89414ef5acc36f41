use crate::routes;
use askme_model::ModelClient;
use askme_session::SessionStore;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Shared application state.
pub struct AppState {
    /// The session store, shared with the sweeper.
    pub sessions: Arc<SessionStore>,
    /// The generative model collaborator.
    pub model: Arc<dyn ModelClient>,
}

/// The main HTTP server.
pub struct GatewayServer;

impl GatewayServer {
    /// Builds the router without CORS (tests, reverse-proxied deployments).
    pub fn build(sessions: Arc<SessionStore>, model: Arc<dyn ModelClient>) -> Router {
        Self::router(sessions, model)
    }

    /// Builds the router with CORS for the given browser origins.
    pub fn build_with_cors(
        sessions: Arc<SessionStore>,
        model: Arc<dyn ModelClient>,
        origins: &[String],
    ) -> Router {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any);

        Self::router(sessions, model).layer(cors)
    }

    fn router(sessions: Arc<SessionStore>, model: Arc<dyn ModelClient>) -> Router {
        let state = Arc::new(AppState { sessions, model });

        Router::new()
            .route("/", get(routes::root))
            .route("/health", get(routes::health))
            .route("/api/session/new", post(routes::create_session))
            .route("/api/chat", post(routes::chat))
            .route(
                "/api/session/{session_id}/history",
                get(routes::session_history),
            )
            .with_state(state)
    }
}
