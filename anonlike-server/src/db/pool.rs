//! Database connection pool management
//!
//! Uses sqlx PgPool with a small fixed size and lazy connects, so startup
//! never waits on the database.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DEFAULT_POOL_SIZE;

/// Create a lazily connecting PostgreSQL pool of [`DEFAULT_POOL_SIZE`].
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed. No
/// connection is attempted here.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/postgres")?;
/// ```
pub fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_POOL_SIZE)
}

/// Create a lazily connecting PostgreSQL pool with custom size.
pub fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(0)
        .connect_lazy(database_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lazy_pool_opens_no_connections() {
        let pool = create_pool("postgres://nobody@127.0.0.1:1/nowhere").expect("url parses");

        assert_eq!(pool.size(), 0);
        assert_eq!(pool.options().get_max_connections(), DEFAULT_POOL_SIZE);
    }

    #[tokio::test]
    async fn rejects_malformed_url() {
        assert!(create_pool("not a url").is_err());
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p anonlike-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_never_exceeds_capacity() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).expect("pool creation failed");

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
        assert!(pool.size() <= DEFAULT_POOL_SIZE);
    }
}
