//! Route handlers.

pub mod diagnostics;
pub mod projects;
pub mod tasks;
