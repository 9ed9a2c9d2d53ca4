//! # tubebrief-db
//!
//! PostgreSQL persistence layer for tubebrief.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, subscriptions, videos, and jobs
//! - In-memory repository implementations for tests
//!
//! The expected table layout lives in `schema.sql` at the crate root and is
//! applied out-of-band.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tubebrief_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/tubebrief").await?;
//!     let subs = db.subscriptions.list_for_user(user_id).await?;
//!     println!("{} subscriptions", subs.len());
//!     Ok(())
//! }
//! ```

pub mod jobs;
pub mod memory;
pub mod pool;
pub mod subscriptions;
pub mod users;
pub mod videos;

// Re-export core types
pub use tubebrief_core::*;

pub use jobs::PgJobRepository;
pub use memory::{
    InMemoryJobRepository, InMemorySubscriptionRepository, InMemoryUserRepository,
    InMemoryVideoRepository,
};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use subscriptions::PgSubscriptionRepository;
pub use users::PgUserRepository;
pub use videos::PgVideoRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User accounts.
    pub users: PgUserRepository,
    /// Channel subscriptions per user.
    pub subscriptions: PgSubscriptionRepository,
    /// Video records and generated artifacts.
    pub videos: PgVideoRepository,
    /// Background processing job queue.
    pub jobs: PgJobRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            subscriptions: PgSubscriptionRepository::new(pool.clone()),
            videos: PgVideoRepository::new(pool.clone()),
            jobs: PgJobRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }
}
