//! anonlike-server: CAPTCHA-gated anonymous likes over HTTP
//!
//! One endpoint lets a visitor like a strategy at most once per 24 hours
//! per IP address, after passing a Turnstile challenge. The pieces:
//!
//! - [`config`] reads the environment once at startup
//! - [`db`] owns the pool and the persistence seam
//! - [`captcha`] owns the verification seam
//! - [`http`] holds the handler, response rendering and server loop

pub mod captcha;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod state;

pub use config::{ConfigError, LikeConfig};
pub use error::{LikeError, LikeResult};
pub use http::{build_router, run_server, ResponseStyle, ServerConfig};
pub use state::AppState;
