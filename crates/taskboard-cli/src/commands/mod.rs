//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use taskboard_client::{ApiClient, ClientConfig};
use taskboard_core::task::model::{TaskPriority, TaskStatus};

pub mod project;
pub mod serve;
pub mod task;
pub mod watch;

/// Taskboard - shared project and task board with live updates
#[derive(Parser)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Board server URL used by client commands
    #[arg(
        long,
        global = true,
        env = "TASKBOARD_URL",
        default_value = taskboard_client::config::DEFAULT_BASE_URL
    )]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the board server
    Serve(serve::ServeArgs),

    /// Follow the board live
    Watch(watch::WatchArgs),

    /// Project management
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Task management
    #[command(subcommand)]
    Task(task::TaskCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = ClientConfig::new(self.url);

        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Watch(args) => watch::execute(args, config).await,
            Commands::Project(cmd) => project::execute(cmd, api(config)?).await,
            Commands::Task(cmd) => task::execute(cmd, api(config)?).await,
        }
    }
}

fn api(config: ClientConfig) -> Result<ApiClient> {
    Ok(ApiClient::new(config)?)
}

pub(crate) fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s).ok_or_else(|| format!("unknown status '{}' (todo, in_progress, done)", s))
}

pub(crate) fn parse_priority(s: &str) -> Result<TaskPriority, String> {
    TaskPriority::parse(s)
        .ok_or_else(|| format!("unknown priority '{}' (low, medium, high, urgent)", s))
}
