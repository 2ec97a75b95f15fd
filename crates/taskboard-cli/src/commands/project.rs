//! Project management commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use taskboard_client::ApiClient;
use taskboard_core::project::{NewProject, ProjectPatch};
use taskboard_core::task::NewTask;

use crate::output;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects with their tasks
    List {
        /// Show every task under each project
        #[arg(long)]
        tasks: bool,
    },

    /// Create a project
    Create(CreateProjectArgs),

    /// Rename a project
    Rename {
        /// Project ID
        project_id: String,
        /// New name
        name: String,
    },

    /// Delete a project and all its tasks
    Delete {
        /// Project ID
        project_id: String,
    },
}

#[derive(Args)]
pub struct CreateProjectArgs {
    /// Project name
    pub name: String,

    /// Project description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Icon shown next to the name
    #[arg(long)]
    pub icon: Option<String>,

    /// Initial task title (repeatable)
    #[arg(short, long = "task")]
    pub tasks: Vec<String>,
}

pub async fn execute(cmd: ProjectCommands, api: ApiClient) -> Result<()> {
    match cmd {
        ProjectCommands::List { tasks } => {
            let projects = api.list_projects().await?;
            if tasks {
                for project in &projects {
                    output::print_project(project);
                    println!();
                }
                if projects.is_empty() {
                    output::print_projects_table(&projects);
                }
            } else {
                output::print_projects_table(&projects);
            }
        }

        ProjectCommands::Create(args) => {
            let input = NewProject {
                name: args.name,
                description: args.description,
                icon: args.icon,
                tasks: args
                    .tasks
                    .into_iter()
                    .map(|title| NewTask {
                        title,
                        ..Default::default()
                    })
                    .collect(),
            };
            let project = api.create_project(&input).await?;
            println!(
                "{} Created project: {} ({}) with {} task(s)",
                "✓".green().bold(),
                project.name.cyan(),
                project.id.dimmed(),
                project.tasks.len()
            );
        }

        ProjectCommands::Rename { project_id, name } => {
            let patch = ProjectPatch {
                name: Some(name),
                ..Default::default()
            };
            let project = api.update_project(&project_id, &patch).await?;
            println!(
                "{} Renamed project {} to {}",
                "✓".green().bold(),
                project.id.dimmed(),
                project.name.cyan()
            );
        }

        ProjectCommands::Delete { project_id } => {
            let message = api.delete_project(&project_id).await?;
            println!("{} {}", "✓".green().bold(), message);
        }
    }

    Ok(())
}
