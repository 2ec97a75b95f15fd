//! Redis connection handling and the storage error type.

use redis::aio::ConnectionManager;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedisError {
    #[error("Redis unavailable: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Stored record is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    /// The write would break a stored relationship (duplicate id, task
    /// changing project).
    #[error("Conflicting write: {0}")]
    Conflict(String),
}

pub type RedisResult<T> = Result<T, RedisError>;

/// Shared multiplexed connection; queries clone it for a mutable handle.
pub type RedisPool = ConnectionManager;

/// Open a connection manager for `redis_url` and check the server answers.
pub async fn init_pool(redis_url: &str) -> RedisResult<RedisPool> {
    let client = redis::Client::open(redis_url)?;
    let mut manager = ConnectionManager::new(client).await?;
    let _: String = redis::cmd("PING").query_async(&mut manager).await?;
    tracing::info!(redis_url = %redis_url, "Connected to Redis");
    Ok(manager)
}
