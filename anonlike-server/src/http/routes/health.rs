//! Liveness probe
//!
//! Never touches the pool or the verification service.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::ResponseStyle;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Encoding the like endpoint answers with
    pub style: ResponseStyle,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        style: state.style(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::captcha::MockVerifier;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn reports_version_and_style() {
        let store = MemoryStore::new();
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(MockVerifier::accepting()),
            ResponseStyle::Human,
        );

        let Json(body) = health(State(state)).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(body.style, ResponseStyle::Human);
        assert_eq!(serde_json::to_value(&body).unwrap()["style"], "human");
        assert_eq!(store.stats().acquired, 0);
    }
}
