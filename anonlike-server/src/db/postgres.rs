//! PostgreSQL like store
//!
//! Queries `public.strategies` and `public.anon_likes`; both id and ip
//! columns are bound as text.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::Mutex;

use super::{DbError, LikeConnection, LikeStore};

/// Like store backed by a sqlx pool
#[derive(Clone)]
pub struct PgLikeStore {
    pool: PgPool,
}

impl PgLikeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LikeStore for PgLikeStore {
    async fn acquire(&self) -> Result<Box<dyn LikeConnection>, DbError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgLikeConnection {
            conn: Mutex::new(conn),
        }))
    }
}

/// One checked-out connection. Statements issued concurrently queue on
/// the mutex and run one after another on the wire.
struct PgLikeConnection {
    conn: Mutex<PoolConnection<Postgres>>,
}

#[async_trait]
impl LikeConnection for PgLikeConnection {
    async fn strategy_exists(&self, strategy: &str) -> Result<bool, DbError> {
        let mut conn = self.conn.lock().await;
        let row = sqlx::query(
            r#"
            SELECT 1
              FROM public.strategies
             WHERE id = $1
            "#,
        )
        .bind(strategy)
        .fetch_optional(&mut **conn)
        .await?;

        Ok(row.is_some())
    }

    async fn recently_liked(&self, strategy: &str, ip: &str) -> Result<bool, DbError> {
        let mut conn = self.conn.lock().await;
        let row = sqlx::query(
            r#"
            SELECT 1
              FROM public.anon_likes
             WHERE strategy = $1
               AND ip_addr = $2
               AND created_at > NOW() - INTERVAL '1 day'
            "#,
        )
        .bind(strategy)
        .bind(ip)
        .fetch_optional(&mut **conn)
        .await?;

        Ok(row.is_some())
    }

    async fn insert_like(&self, strategy: &str, ip: &str) -> Result<(), DbError> {
        let mut conn = self.conn.lock().await;
        sqlx::query(
            r#"
            INSERT INTO public.anon_likes (strategy, ip_addr)
            VALUES ($1, $2)
            "#,
        )
        .bind(strategy)
        .bind(ip)
        .execute(&mut **conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    async fn seeded_store() -> PgLikeStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).expect("pool creation failed");

        sqlx::query("CREATE TABLE IF NOT EXISTS public.strategies (id TEXT PRIMARY KEY)")
            .execute(&pool)
            .await
            .expect("strategies setup failed");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS public.anon_likes (
                strategy TEXT NOT NULL,
                ip_addr TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("anon_likes setup failed");

        PgLikeStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_recently_liked() {
        let store = seeded_store().await;
        let ip = format!("10.0.0.{}", std::process::id() % 250);

        sqlx::query("INSERT INTO public.strategies (id) VALUES ('pg-test') ON CONFLICT DO NOTHING")
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM public.anon_likes WHERE strategy = 'pg-test' AND ip_addr = $1")
            .bind(&ip)
            .execute(store.pool())
            .await
            .unwrap();

        let conn = store.acquire().await.unwrap();
        assert!(conn.strategy_exists("pg-test").await.unwrap());
        assert!(!conn.recently_liked("pg-test", &ip).await.unwrap());

        conn.insert_like("pg-test", &ip).await.unwrap();
        assert!(conn.recently_liked("pg-test", &ip).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn like_older_than_a_day_does_not_count() {
        let store = seeded_store().await;

        sqlx::query(
            r#"
            INSERT INTO public.anon_likes (strategy, ip_addr, created_at)
            VALUES ('pg-old', '10.1.1.1', NOW() - INTERVAL '1 day' - INTERVAL '1 second')
            "#,
        )
        .execute(store.pool())
        .await
        .unwrap();

        let conn = store.acquire().await.unwrap();
        assert!(!conn.recently_liked("pg-old", "10.1.1.1").await.unwrap());
    }
}
