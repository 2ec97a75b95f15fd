//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use taskboard_core::project::model::Project;
use taskboard_core::task::model::{Task, TaskPriority, TaskStatus};

pub fn status_colored(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Todo => status.label().normal(),
        TaskStatus::InProgress => status.label().yellow(),
        TaskStatus::Done => status.label().green(),
    }
}

pub fn priority_colored(priority: TaskPriority) -> ColoredString {
    match priority {
        TaskPriority::Low => priority.label().dimmed(),
        TaskPriority::Medium => priority.label().normal(),
        TaskPriority::High => priority.label().yellow(),
        TaskPriority::Urgent => priority.label().red().bold(),
    }
}

/// Print projects as a table with per-status task counts.
pub fn print_projects_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("{}", "No projects found.".dimmed());
        return;
    }

    println!(
        "{:<10} {:<30} {:>6} {:>12} {:>6}",
        "ID", "Name", "To Do", "In Progress", "Done"
    );
    println!("{}", "─".repeat(68));

    for project in projects {
        let counts = status_counts(&project.tasks);
        println!(
            "{:<10} {:<30} {:>6} {:>12} {:>6}",
            short_id(&project.id),
            truncate(&display_name(project), 28),
            counts[0],
            counts[1],
            counts[2].to_string().green()
        );
    }
}

/// Print one project with its tasks.
pub fn print_project(project: &Project) {
    println!(
        "{} {}",
        display_name(project).cyan().bold(),
        format!("({})", project.id).dimmed()
    );
    if let Some(description) = &project.description {
        println!("  {}", description);
    }
    if project.tasks.is_empty() {
        println!("  {}", "No tasks.".dimmed());
    }
    for task in &project.tasks {
        print_task_line(task);
    }
}

pub fn print_task_line(task: &Task) {
    let due = task
        .due_date
        .as_deref()
        .map(|d| format!(" due {}", d.get(..10).unwrap_or(d)))
        .unwrap_or_default();
    println!(
        "  {:<10} {:<32} {:<12} {:<7}{}",
        short_id(&task.id).dimmed(),
        truncate(&task.title, 30),
        status_colored(task.status),
        priority_colored(task.priority),
        due.dimmed()
    );
}

fn display_name(project: &Project) -> String {
    match &project.icon {
        Some(icon) => format!("{} {}", icon, project.name),
        None => project.name.clone(),
    }
}

fn status_counts(tasks: &[Task]) -> [usize; 3] {
    let mut counts = [0; 3];
    for task in tasks {
        if let Some(i) = TaskStatus::ALL.iter().position(|s| *s == task.status) {
            counts[i] += 1;
        }
    }
    counts
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
