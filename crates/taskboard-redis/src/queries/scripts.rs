//! Server-side scripts for writes that must check and mutate in one step.
//!
//! Redis runs each script atomically, so no other client can observe or
//! interleave with the intermediate state.

use std::sync::LazyLock;

use redis::Script;

/// Merge a JSON object of changes into the `data` field of a row hash.
///
/// KEYS[1] row hash. ARGV[1] changes as a JSON object.
/// Returns the merged row, or nil when the row does not exist.
pub(crate) static MERGE_ROW: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r#"
local data = redis.call('HGET', KEYS[1], 'data')
if not data then
    return false
end
local row = cjson.decode(data)
for field, value in pairs(cjson.decode(ARGV[1])) do
    row[field] = value
end
local merged = cjson.encode(row)
redis.call('HSET', KEYS[1], 'data', merged)
return merged
"#,
    )
});

/// Insert a task only while its project exists.
///
/// KEYS[1] project hash, KEYS[2] project task index, KEYS[3] task hash.
/// ARGV[1] task JSON, ARGV[2] creation score, ARGV[3] task id.
/// Returns 1 on insert, 0 when the project is gone.
pub(crate) static INSERT_TASK: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
redis.call('HSET', KEYS[3], 'data', ARGV[1])
redis.call('ZADD', KEYS[2], ARGV[2], ARGV[3])
return 1
"#,
    )
});

/// Remove a project, its task index and every task it lists.
///
/// KEYS[1] project hash, KEYS[2] project task index, KEYS[3] project index.
/// ARGV[1] project id, ARGV[2] task key prefix.
/// Returns the number of tasks removed, or -1 when the project is missing.
/// Task keys are built inside the script, so this needs a single-node server.
pub(crate) static DELETE_PROJECT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return -1
end
local ids = redis.call('ZRANGE', KEYS[2], 0, -1)
for _, id in ipairs(ids) do
    redis.call('DEL', ARGV[2] .. id)
end
redis.call('DEL', KEYS[2], KEYS[1])
redis.call('ZREM', KEYS[3], ARGV[1])
return #ids
"#,
    )
});
