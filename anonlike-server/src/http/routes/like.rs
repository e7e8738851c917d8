//! Anonymous like endpoint
//!
//! POST body `{ "strategy": "...", "token": "..." }`. One pooled
//! connection is held for the whole request and released when the handle
//! drops, on every exit path. The captcha is checked before any statement
//! runs; the two lookups are then awaited together.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use tracing::{info, info_span, Instrument};

use crate::captcha::CaptchaVerifier;
use crate::db::LikeConnection;
use crate::error::LikeResult;
use crate::http::{cors, LikeOutcome};
use crate::state::AppState;

/// Path the endpoint is served under besides `/`.
pub const LIKE_PATH: &str = "/anonymous-like";

/// Like request body
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub strategy: String,
    pub token: String,
}

/// First entry of `x-forwarded-for`, or `""` when there is none.
///
/// Bytes outside UTF-8 are replaced rather than discarding the header.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .and_then(|list| list.split(',').next().map(|first| first.trim().to_string()))
        .unwrap_or_default()
}

/// Decide and apply one like on an already checked-out connection.
pub async fn process_like(
    verifier: &dyn CaptchaVerifier,
    conn: &dyn LikeConnection,
    request: &LikeRequest,
    ip: &str,
) -> LikeResult<LikeOutcome> {
    if !verifier.verify(&request.token, ip).await? {
        info!("captcha rejected");
        return Ok(LikeOutcome::CaptchaFailed);
    }

    let (exists, liked) = tokio::try_join!(
        conn.strategy_exists(&request.strategy),
        conn.recently_liked(&request.strategy, ip),
    )?;

    if !exists {
        info!("strategy not found");
        return Ok(LikeOutcome::StrategyNotFound);
    }

    if liked {
        info!("already liked within window");
        return Ok(LikeOutcome::AlreadyLiked);
    }

    conn.insert_like(&request.strategy, ip).await?;
    info!("like recorded");

    Ok(LikeOutcome::Liked)
}

/// POST /anonymous-like
async fn like(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> LikeResult<Response> {
    let conn = state.store().acquire().await?;

    let request: LikeRequest = serde_json::from_slice(&body)?;
    let ip = client_ip(&headers);

    let span = info_span!("like", strategy = %request.strategy, ip = %ip);
    let outcome = process_like(state.verifier(), conn.as_ref(), &request, &ip)
        .instrument(span)
        .await?;

    Ok(state.style().respond(outcome))
}

/// OPTIONS /anonymous-like
async fn preflight() -> Response {
    (StatusCode::OK, cors::headers(), "ok").into_response()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIKE_PATH, post(like).options(preflight))
        .route("/", post(like).options(preflight))
}
