//! Error types for anonlike-server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::captcha::CaptchaError;
use crate::db::DbError;
use crate::http::cors;

pub type LikeResult<T> = Result<T, LikeError>;

/// Anything that aborts a like request.
///
/// Rejections (failed captcha, unknown strategy, duplicate) are normal
/// outcomes and never show up here.
#[derive(Error, Debug)]
pub enum LikeError {
    #[error(transparent)]
    Body(#[from] serde_json::Error),

    #[error("captcha verification failed: {0}")]
    Captcha(#[from] CaptchaError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl IntoResponse for LikeError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "like request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            cors::headers(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn body_error_is_500_with_message() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = parse_err.to_string();

        let response = LikeError::Body(parse_err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, expected.as_bytes());
    }

    #[tokio::test]
    async fn database_error_is_500() {
        let err = LikeError::Database(DbError::Unavailable("pool closed".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "database unavailable: pool closed".as_bytes());
    }
}
