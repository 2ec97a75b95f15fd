//! Web server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taskboard_db::{BoardStore, MemoryStore, DEFAULT_REDIS_URL};
use taskboard_web::ServerConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "TASKBOARD_PORT", default_value_t = taskboard_web::config::DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "TASKBOARD_HOST", default_value = taskboard_web::config::DEFAULT_HOST)]
    pub host: String,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    /// Keep data in memory instead of Redis (lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Upper bound on each data-store call, in milliseconds
    #[arg(long, env = "TASKBOARD_STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,

    /// Events buffered per WebSocket client before new ones are dropped
    #[arg(long, default_value_t = taskboard_core::broadcast::DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (with --log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            queue_capacity: self.queue_capacity,
        }
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = args.server_config();

    let (store, backend): (Arc<dyn BoardStore>, String) = if args.memory {
        (Arc::new(MemoryStore::new()), "in-memory".to_string())
    } else {
        let store = taskboard_db::connect_redis(&args.redis_url)
            .await
            .with_context(|| format!("Failed to connect to Redis at {}", args.redis_url))?;
        (Arc::new(store), args.redis_url.clone())
    };

    println!();
    println!("  {} {}", "Taskboard".cyan().bold(), "Server".bold());
    println!();
    println!("  {}        http://{}/projects", "API".green(), config.bind_addr());
    println!("  {}  ws://{}/ws", "WebSocket".green(), config.bind_addr());
    println!("  {}      {}", "Store".green(), backend);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    taskboard_web::run_server(store, config).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn flags_flow_into_server_config() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "serve",
            "--memory",
            "--port",
            "4040",
            "--store-timeout-ms",
            "250",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.memory);

        let config = args.server_config();
        assert_eq!(config.port, 4040);
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.bind_addr(), format!("{}:4040", config.host));
    }
}
