//! Taskboard Redis Data Layer
//!
//! Async Redis persistence for projects and their tasks.

pub mod client;
pub mod queries;

pub use client::{init_pool, RedisError, RedisPool, RedisResult};
pub use queries::projects;
pub use queries::tasks;
pub use queries::{ProjectChanges, ProjectRow, TaskChanges, TaskRow};
