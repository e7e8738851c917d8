//! CAPTCHA verification - trait and implementations
//!
//! Provides a trait for checking challenge tokens, with:
//! - Turnstile implementation over reqwest
//! - Mock implementation for testing

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LikeConfig;

/// Error talking to the verification service
#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("verification service returned {0}")]
    Status(reqwest::StatusCode),
}

/// Trait for token verification (testable)
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `Ok(false)` is a rejection; `Err` means the service could not be asked.
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, CaptchaError>;
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile siteverify client
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret: String,
    endpoint: String,
}

impl TurnstileVerifier {
    pub fn new(secret: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret: secret.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &LikeConfig) -> Self {
        Self::new(config.captcha_secret.clone(), config.verify_url.clone())
    }
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, CaptchaError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("secret", self.secret.as_str()),
                ("response", token),
                ("remoteip", remote_ip),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptchaError::Status(status));
        }

        let outcome: SiteverifyResponse = response.json().await?;
        if !outcome.success {
            tracing::debug!(error_codes = ?outcome.error_codes, "turnstile rejected token");
        }

        Ok(outcome.success)
    }
}

/// A call seen by [`MockVerifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCall {
    pub token: String,
    pub remote_ip: String,
}

/// Mock verifier for testing
pub struct MockVerifier {
    verdict: Option<bool>,
    calls: Mutex<Vec<VerifyCall>>,
}

impl MockVerifier {
    pub fn accepting() -> Self {
        Self::with_verdict(Some(true))
    }

    pub fn rejecting() -> Self {
        Self::with_verdict(Some(false))
    }

    /// Every call fails as if the service answered 503.
    pub fn failing() -> Self {
        Self::with_verdict(None)
    }

    fn with_verdict(verdict: Option<bool>) -> Self {
        Self {
            verdict,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<VerifyCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl CaptchaVerifier for MockVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, CaptchaError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(VerifyCall {
                token: token.to_string(),
                remote_ip: remote_ip.to_string(),
            });
        self.verdict
            .ok_or(CaptchaError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}
