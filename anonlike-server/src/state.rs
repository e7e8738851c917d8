//! Application state shared across handlers

use std::sync::Arc;

use crate::captcha::CaptchaVerifier;
use crate::db::LikeStore;
use crate::http::ResponseStyle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn LikeStore>,
    verifier: Arc<dyn CaptchaVerifier>,
    style: ResponseStyle,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LikeStore>,
        verifier: Arc<dyn CaptchaVerifier>,
        style: ResponseStyle,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                verifier,
                style,
            }),
        }
    }

    pub fn store(&self) -> &dyn LikeStore {
        self.inner.store.as_ref()
    }

    pub fn verifier(&self) -> &dyn CaptchaVerifier {
        self.inner.verifier.as_ref()
    }

    pub fn style(&self) -> ResponseStyle {
        self.inner.style
    }
}
