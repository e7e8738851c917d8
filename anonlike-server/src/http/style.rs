//! Outcome rendering
//!
//! The endpoint has two wire encodings for the same four outcomes:
//! machine codes that always come back as 200, or human messages with
//! conventional status codes.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::cors;

/// Non-exceptional result of a like request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    CaptchaFailed,
    StrategyNotFound,
    AlreadyLiked,
    Liked,
}

/// How outcomes are encoded on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    /// `200` with an `ERROR_*` / `SUCCESS` code
    #[default]
    Machine,
    /// 403 / 404 / 200 with a sentence
    Human,
}

impl ResponseStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Machine => "machine",
            Self::Human => "human",
        }
    }

    /// Status and body for an outcome.
    pub fn render(self, outcome: LikeOutcome) -> (StatusCode, &'static str) {
        use LikeOutcome::*;

        match self {
            Self::Machine => match outcome {
                CaptchaFailed => (StatusCode::OK, "ERROR_CAPTCHA_FAILED"),
                StrategyNotFound => (StatusCode::OK, "ERROR_STRATEGY_NOT_FOUND"),
                AlreadyLiked => (StatusCode::OK, "ERROR_ALREADY_LIKED"),
                Liked => (StatusCode::OK, "SUCCESS"),
            },
            Self::Human => match outcome {
                CaptchaFailed => (StatusCode::FORBIDDEN, "Failed to verify captcha"),
                StrategyNotFound => (StatusCode::NOT_FOUND, "Strategy not found"),
                AlreadyLiked => (
                    StatusCode::FORBIDDEN,
                    "You have already liked this strategy in the last 24 hours",
                ),
                Liked => (StatusCode::OK, "Liked!"),
            },
        }
    }

    pub fn respond(self, outcome: LikeOutcome) -> Response {
        let (status, body) = self.render(outcome);
        (status, cors::headers(), body).into_response()
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown response style '{0}' (expected 'machine' or 'human')")]
pub struct UnknownStyle(String);

impl FromStr for ResponseStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "machine" => Ok(Self::Machine),
            "human" => Ok(Self::Human),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_style_is_always_200() {
        for outcome in [
            LikeOutcome::CaptchaFailed,
            LikeOutcome::StrategyNotFound,
            LikeOutcome::AlreadyLiked,
            LikeOutcome::Liked,
        ] {
            assert_eq!(ResponseStyle::Machine.render(outcome).0, StatusCode::OK);
        }
        assert_eq!(
            ResponseStyle::Machine.render(LikeOutcome::AlreadyLiked).1,
            "ERROR_ALREADY_LIKED"
        );
    }

    #[test]
    fn human_style_uses_status_codes() {
        let human = ResponseStyle::Human;
        assert_eq!(
            human.render(LikeOutcome::CaptchaFailed),
            (StatusCode::FORBIDDEN, "Failed to verify captcha")
        );
        assert_eq!(
            human.render(LikeOutcome::StrategyNotFound),
            (StatusCode::NOT_FOUND, "Strategy not found")
        );
        assert_eq!(human.render(LikeOutcome::AlreadyLiked).0, StatusCode::FORBIDDEN);
        assert_eq!(human.render(LikeOutcome::Liked), (StatusCode::OK, "Liked!"));
    }

    #[test]
    fn both_styles_attach_cors() {
        for style in [ResponseStyle::Machine, ResponseStyle::Human] {
            let response = style.respond(LikeOutcome::StrategyNotFound);
            assert_eq!(response.headers()["access-control-allow-origin"], "*");
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("machine".parse::<ResponseStyle>().unwrap(), ResponseStyle::Machine);
        assert_eq!(" Human ".parse::<ResponseStyle>().unwrap(), ResponseStyle::Human);
        assert!("terse".parse::<ResponseStyle>().is_err());
        assert_eq!(ResponseStyle::Human.to_string(), "human");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&ResponseStyle::Machine).unwrap(), r#""machine""#);
        assert_eq!(
            serde_json::from_str::<ResponseStyle>(r#""human""#).unwrap(),
            ResponseStyle::Human
        );
        assert!(serde_json::from_str::<ResponseStyle>(r#""Human""#).is_err());
    }
}
