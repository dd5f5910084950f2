use clap::Subcommand;
use color_eyre::Result;

use crate::repository::{RepositoryError, TasksHandle};
use crate::tasks::{Task, TasksFilter};

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// List tasks
  List {
    /// Which tasks to show
    #[arg(short, long, value_enum, default_value_t = TasksFilter::All)]
    filter: TasksFilter,
    /// Skip the local copy and reload from the remote service. The service is
    /// simulated in-process, so this replaces local tasks with its example tasks
    #[arg(short, long)]
    refresh: bool,
    /// Print JSON instead of a plain listing
    #[arg(long)]
    json: bool,
  },
  /// Show a single task
  Show { id: String },
  /// Add a new task
  Add {
    title: String,
    #[arg(short, long, default_value = "")]
    description: String,
  },
  /// Mark a task as completed
  Complete { id: String },
  /// Mark a task as active again
  Activate { id: String },
  /// Delete every completed task
  ClearCompleted,
  /// Delete a task
  Delete { id: String },
  /// Delete every task
  DeleteAll,
}

impl Default for Command {
  fn default() -> Self {
    Command::List {
      filter: TasksFilter::All,
      refresh: false,
      json: false,
    }
  }
}

impl Command {
  pub async fn run(self, tasks: &TasksHandle) -> Result<()> {
    match self {
      Command::List {
        filter,
        refresh,
        json,
      } => {
        if refresh {
          tasks.refresh_tasks().await?;
        }
        let all = load_tasks(tasks).await?;
        print_tasks(&all, filter, json)?;
      }
      Command::Show { id } => {
        let task = tasks.get_task(&id).await?;
        print_task(&task);
        if !task.description.is_empty() && task.description != task.display_title() {
          println!("    {}", task.description);
        }
      }
      Command::Add { title, description } => {
        if title.trim().is_empty() && description.trim().is_empty() {
          return Err(color_eyre::eyre::eyre!("A task needs a title or a description"));
        }
        let task = Task::new(title, description);
        let id = task.id.clone();
        tasks.save_task(task).await?;
        println!("{}", id);
      }
      Command::Complete { id } => {
        // Id-only writes resolve through the cache, so fill it first
        load_tasks(tasks).await?;
        tasks.complete_task(id).await?;
      }
      Command::Activate { id } => {
        load_tasks(tasks).await?;
        tasks.activate_task(id).await?;
      }
      Command::ClearCompleted => tasks.clear_completed_tasks().await?,
      Command::Delete { id } => tasks.delete_task(&id).await?,
      Command::DeleteAll => tasks.delete_all_tasks().await?,
    }

    Ok(())
  }
}

/// Load every task, treating "not available" as an empty list.
async fn load_tasks(tasks: &TasksHandle) -> Result<Vec<Task>> {
  match tasks.get_tasks().await {
    Ok(all) => Ok(all),
    Err(RepositoryError::NotAvailable) => Ok(Vec::new()),
    Err(e) => Err(e.into()),
  }
}

fn print_tasks(all: &[Task], filter: TasksFilter, json: bool) -> Result<()> {
  let shown: Vec<&Task> = all.iter().filter(|t| filter.matches(t)).collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&shown)?);
    return Ok(());
  }

  if shown.is_empty() {
    println!("{}", filter.empty_message());
  }
  for task in shown {
    print_task(task);
  }
  Ok(())
}

fn print_task(task: &Task) {
  let mark = if task.completed { "x" } else { " " };
  println!("[{}] {}  ({})", mark, task.display_title(), task.id);
}
