//! Redis queries for projects and their task indexes.

use super::scripts::{DELETE_PROJECT, MERGE_ROW};
use super::{
    creation_score, decode_listed, project_key, project_tasks_key, tasks, ProjectChanges,
    ProjectRow, TaskRow, PROJECTS_KEY, TASK_KEY_PREFIX,
};
use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;

/// Insert a project together with its initial tasks in one MULTI/EXEC.
pub async fn create_project(
    pool: &RedisPool,
    row: &ProjectRow,
    initial_tasks: &[TaskRow],
) -> RedisResult<()> {
    let mut conn = pool.clone();
    let mut pipe = redis::pipe();
    pipe.atomic();
    pipe.hset(project_key(&row.id), "data", serde_json::to_string(row)?)
        .ignore();
    pipe.zadd(PROJECTS_KEY, &row.id, creation_score(&row.created_at))
        .ignore();
    for task in initial_tasks {
        tasks::queue_save(&mut pipe, task)?;
    }
    let _: () = pipe.query_async(&mut conn).await?;
    Ok(())
}

pub async fn get_project(pool: &RedisPool, project_id: &str) -> RedisResult<ProjectRow> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(project_key(project_id), "data").await?;
    match json {
        Some(j) => Ok(serde_json::from_str(&j)?),
        None => Err(RedisError::NotFound(format!(
            "Project not found: {}",
            project_id
        ))),
    }
}

/// All projects in creation order.
pub async fn list_projects(pool: &RedisPool) -> RedisResult<Vec<ProjectRow>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrange(PROJECTS_KEY, 0, -1).await?;
    let mut projects = Vec::with_capacity(ids.len());
    for id in ids {
        let json: Option<String> = conn.hget(project_key(&id), "data").await?;
        if let Some(row) = json.and_then(|j| decode_listed("project", &id, &j)) {
            projects.push(row);
        }
    }
    Ok(projects)
}

/// Apply field-level changes to a project and return the stored result.
pub async fn update_project(
    pool: &RedisPool,
    project_id: &str,
    changes: &ProjectChanges,
) -> RedisResult<ProjectRow> {
    let mut conn = pool.clone();
    let merged: Option<String> = MERGE_ROW
        .key(project_key(project_id))
        .arg(serde_json::to_string(changes)?)
        .invoke_async(&mut conn)
        .await?;
    match merged {
        Some(j) => Ok(serde_json::from_str(&j)?),
        None => Err(RedisError::NotFound(format!(
            "Project not found: {}",
            project_id
        ))),
    }
}

/// Remove a project and every task it owns.
pub async fn delete_project(pool: &RedisPool, project_id: &str) -> RedisResult<()> {
    let mut conn = pool.clone();
    let removed: i64 = DELETE_PROJECT
        .key(project_key(project_id))
        .key(project_tasks_key(project_id))
        .key(PROJECTS_KEY)
        .arg(project_id)
        .arg(TASK_KEY_PREFIX)
        .invoke_async(&mut conn)
        .await?;
    if removed < 0 {
        return Err(RedisError::NotFound(format!(
            "Project not found: {}",
            project_id
        )));
    }

    tracing::debug!(project_id = %project_id, removed_tasks = removed, "Project deleted");
    Ok(())
}
