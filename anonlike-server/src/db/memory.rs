//! In-memory like store
//!
//! Stands in for the Postgres pool in tests and local runs. Capacity is
//! enforced with a semaphore so checkout waits exactly like the real pool,
//! and every checkout, release and statement is counted.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::{like_window, DbError, LikeConnection, LikeStore};
use crate::config::DEFAULT_POOL_SIZE;

/// One row of `anon_likes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonLike {
    pub strategy: String,
    pub ip_addr: String,
    pub created_at: DateTime<Utc>,
}

/// Counters over the lifetime of a [`MemoryStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub acquired: usize,
    pub released: usize,
    /// Read statements issued (inserts excluded)
    pub queries: usize,
    pub inserts: usize,
}

#[derive(Default)]
struct Tables {
    strategies: HashSet<String>,
    likes: Vec<AnonLike>,
    stats: StoreStats,
    failure: Option<String>,
    insert_failure: Option<String>,
}

/// Like store held entirely in process memory
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    slots: Arc<Semaphore>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_SIZE as usize)
    }

    pub fn with_capacity(connections: usize) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            slots: Arc::new(Semaphore::new(connections)),
        }
    }

    pub fn add_strategy(&self, id: impl Into<String>) {
        lock(&self.tables).strategies.insert(id.into());
    }

    /// Insert a like row with an explicit timestamp.
    pub fn record_like(&self, strategy: &str, ip: &str, created_at: DateTime<Utc>) {
        lock(&self.tables).likes.push(AnonLike {
            strategy: strategy.to_string(),
            ip_addr: ip.to_string(),
            created_at,
        });
    }

    pub fn likes(&self) -> Vec<AnonLike> {
        lock(&self.tables).likes.clone()
    }

    /// Rows for one (strategy, ip) pair, regardless of age.
    pub fn like_count(&self, strategy: &str, ip: &str) -> usize {
        lock(&self.tables)
            .likes
            .iter()
            .filter(|like| like.strategy == strategy && like.ip_addr == ip)
            .count()
    }

    pub fn stats(&self) -> StoreStats {
        lock(&self.tables).stats
    }

    /// Make every subsequent statement fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        lock(&self.tables).failure = Some(message.into());
    }

    /// Make inserts fail with `message` while lookups keep working.
    pub fn fail_inserts_with(&self, message: impl Into<String>) {
        lock(&self.tables).insert_failure = Some(message.into());
    }

    /// Connections not currently checked out.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}

fn lock(tables: &Mutex<Tables>) -> MutexGuard<'_, Tables> {
    tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn acquire(&self) -> Result<Box<dyn LikeConnection>, DbError> {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DbError::Unavailable("pool closed".into()))?;

        lock(&self.tables).stats.acquired += 1;

        Ok(Box::new(MemoryConnection {
            tables: Arc::clone(&self.tables),
            _permit: permit,
        }))
    }
}

struct MemoryConnection {
    tables: Arc<Mutex<Tables>>,
    _permit: OwnedSemaphorePermit,
}

impl MemoryConnection {
    fn statement(&self) -> Result<MutexGuard<'_, Tables>, DbError> {
        let tables = lock(&self.tables);
        if let Some(message) = tables.failure.clone() {
            return Err(DbError::Unavailable(message));
        }
        Ok(tables)
    }
}

#[async_trait]
impl LikeConnection for MemoryConnection {
    async fn strategy_exists(&self, strategy: &str) -> Result<bool, DbError> {
        let mut tables = self.statement()?;
        tables.stats.queries += 1;
        Ok(tables.strategies.contains(strategy))
    }

    async fn recently_liked(&self, strategy: &str, ip: &str) -> Result<bool, DbError> {
        let mut tables = self.statement()?;
        tables.stats.queries += 1;

        let cutoff = Utc::now() - like_window();
        Ok(tables
            .likes
            .iter()
            .any(|like| like.strategy == strategy && like.ip_addr == ip && like.created_at > cutoff))
    }

    async fn insert_like(&self, strategy: &str, ip: &str) -> Result<(), DbError> {
        let mut tables = self.statement()?;
        if let Some(message) = tables.insert_failure.clone() {
            return Err(DbError::Unavailable(message));
        }
        tables.stats.inserts += 1;
        tables.likes.push(AnonLike {
            strategy: strategy.to_string(),
            ip_addr: ip.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        lock(&self.tables).stats.released += 1;
    }
}
