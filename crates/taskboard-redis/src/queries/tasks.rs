//! Redis queries for tasks.

use super::scripts::{INSERT_TASK, MERGE_ROW};
use super::{
    creation_score, decode_listed, project_key, project_tasks_key, task_key, TaskChanges, TaskRow,
};
use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;

/// Queue the writes for a task row onto a pipeline.
pub(crate) fn queue_save(pipe: &mut redis::Pipeline, row: &TaskRow) -> RedisResult<()> {
    pipe.hset(task_key(&row.id), "data", serde_json::to_string(row)?)
        .ignore();
    pipe.zadd(
        project_tasks_key(&row.project_id),
        &row.id,
        creation_score(&row.created_at),
    )
    .ignore();
    Ok(())
}

/// Insert a task. The owning project must exist.
pub async fn create_task(pool: &RedisPool, row: &TaskRow) -> RedisResult<()> {
    let mut conn = pool.clone();
    let inserted: i64 = INSERT_TASK
        .key(project_key(&row.project_id))
        .key(project_tasks_key(&row.project_id))
        .key(task_key(&row.id))
        .arg(serde_json::to_string(row)?)
        .arg(creation_score(&row.created_at))
        .arg(&row.id)
        .invoke_async(&mut conn)
        .await?;
    if inserted == 0 {
        return Err(RedisError::NotFound(format!(
            "Project not found: {}",
            row.project_id
        )));
    }
    Ok(())
}

pub async fn get_task(pool: &RedisPool, task_id: &str) -> RedisResult<TaskRow> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(task_key(task_id), "data").await?;
    match json {
        Some(j) => Ok(serde_json::from_str(&j)?),
        None => Err(RedisError::NotFound(format!("Task not found: {}", task_id))),
    }
}

/// Apply field-level changes to a task and return the stored result.
pub async fn update_task(
    pool: &RedisPool,
    task_id: &str,
    changes: &TaskChanges,
) -> RedisResult<TaskRow> {
    let mut conn = pool.clone();
    let merged: Option<String> = MERGE_ROW
        .key(task_key(task_id))
        .arg(serde_json::to_string(changes)?)
        .invoke_async(&mut conn)
        .await?;
    match merged {
        Some(j) => Ok(serde_json::from_str(&j)?),
        None => Err(RedisError::NotFound(format!("Task not found: {}", task_id))),
    }
}

/// Tasks of a project in creation order.
pub async fn list_tasks(pool: &RedisPool, project_id: &str) -> RedisResult<Vec<TaskRow>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrange(project_tasks_key(project_id), 0, -1).await?;
    let mut tasks = Vec::with_capacity(ids.len());
    for id in ids {
        let json: Option<String> = conn.hget(task_key(&id), "data").await?;
        if let Some(row) = json.and_then(|j| decode_listed("task", &id, &j)) {
            tasks.push(row);
        }
    }
    Ok(tasks)
}

