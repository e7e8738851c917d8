//! Database layer - connection pool and the like store seam
//!
//! One pooled connection is checked out per request and handed back when
//! its handle drops. The duplicate guard is check-then-insert with no
//! uniqueness constraint behind it.

pub mod memory;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;
use chrono::Duration;

pub use memory::{AnonLike, MemoryStore, StoreStats};
pub use pool::{create_pool, create_pool_with_options};
pub use postgres::PgLikeStore;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

/// Trailing window in which a (strategy, ip) pair may like only once.
pub fn like_window() -> Duration {
    Duration::days(1)
}

/// A bounded source of connections.
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Check out one connection, waiting while every connection is in use.
    ///
    /// Dropping the returned handle releases it.
    async fn acquire(&self) -> Result<Box<dyn LikeConnection>, DbError>;
}

/// The three statements the like endpoint issues.
///
/// Methods take `&self` so the two lookups can be awaited together.
#[async_trait]
pub trait LikeConnection: Send + Sync {
    /// Whether a strategy with this id exists.
    async fn strategy_exists(&self, strategy: &str) -> Result<bool, DbError>;

    /// Whether this ip liked this strategy within [`like_window`].
    async fn recently_liked(&self, strategy: &str, ip: &str) -> Result<bool, DbError>;

    /// Record a like stamped with the current time.
    async fn insert_like(&self, strategy: &str, ip: &str) -> Result<(), DbError>;
}
