//! Taskboard Database Layer
//!
//! The `BoardStore` trait is the only way the rest of the workspace reaches
//! persisted projects and tasks. Redis backs it in production; an in-memory
//! table set backs it in tests and `--memory` mode.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{BoardStore, RedisStore};
pub use taskboard_redis::RedisError as DbError;
pub use taskboard_redis::RedisResult as DbResult;
pub use taskboard_redis::{ProjectChanges, ProjectRow, TaskChanges, TaskRow};

/// Default Redis URL when `REDIS_URL` is unset.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Connect a Redis-backed store.
pub async fn connect_redis(redis_url: &str) -> DbResult<RedisStore> {
    let pool = taskboard_redis::init_pool(redis_url).await?;
    Ok(RedisStore::new(pool))
}
