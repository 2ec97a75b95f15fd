//! Live board view.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use taskboard_client::{ApiClient, ClientConfig, ConnectionState, LiveBoard};
use taskboard_core::project::model::Project;
use taskboard_core::task::model::TaskStatus;
use tracing::warn;

use crate::output;

/// Only changes what gets printed; the server does not distinguish roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Manager,
    Employee,
}

#[derive(Args)]
pub struct WatchArgs {
    /// View to render
    #[arg(long, value_enum, default_value_t = Role::Manager)]
    pub role: Role,
}

pub async fn execute(args: WatchArgs, config: ClientConfig) -> Result<()> {
    let api = ApiClient::new(config.clone())?;
    let board = LiveBoard::connect(&config, api);
    let mut status = board.status();
    let mut invalidations = board.cache().invalidations();

    println!(
        "{} Watching {} as {}",
        "●".dimmed(),
        config.base_url.cyan(),
        format!("{:?}", args.role).to_lowercase().bold()
    );
    print_status(*status.borrow_and_update());
    render(&board, args.role).await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *status.borrow_and_update();
                print_status(state);
            }
            changed = invalidations.changed() => {
                if changed.is_err() {
                    break;
                }
                let _ = invalidations.borrow_and_update();
                render(&board, args.role).await;
            }
        }
    }

    board.shutdown().await;
    println!("{}", "Stopped.".dimmed());
    Ok(())
}

fn print_status(state: ConnectionState) {
    let label = match state {
        ConnectionState::Connected => state.as_str().green(),
        ConnectionState::Disconnected => state.as_str().red(),
    };
    println!("{} {}", "●".bold(), label);
}

async fn render(board: &LiveBoard<ApiClient>, role: Role) {
    match board.cache().get().await {
        Ok(projects) => {
            println!();
            match role {
                Role::Manager => output::print_projects_table(&projects),
                Role::Employee => print_work_queue(&projects),
            }
            println!();
        }
        Err(e) => warn!(error = %e, "Failed to refresh projects"),
    }
}

/// Open tasks grouped by status, across all projects.
fn print_work_queue(projects: &[Project]) {
    for status in TaskStatus::ALL {
        let tasks: Vec<_> = projects
            .iter()
            .flat_map(|p| p.tasks.iter().map(move |t| (p, t)))
            .filter(|(_, t)| t.status == status)
            .collect();

        println!(
            "{} {}",
            output::status_colored(status).bold(),
            format!("({})", tasks.len()).dimmed()
        );
        for (project, task) in tasks {
            output::print_task_line(task);
            println!("  {:<10} {}", "", project.name.dimmed());
        }
    }
}
