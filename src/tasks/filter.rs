use clap::ValueEnum;

use super::types::Task;

/// Which tasks a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TasksFilter {
  #[default]
  All,
  Active,
  Completed,
}

impl TasksFilter {
  pub fn matches(&self, task: &Task) -> bool {
    match self {
      TasksFilter::All => true,
      TasksFilter::Active => task.is_active(),
      TasksFilter::Completed => task.completed,
    }
  }

  /// Message shown when nothing matches the filter.
  pub fn empty_message(&self) -> &'static str {
    match self {
      TasksFilter::All => "No tasks.",
      TasksFilter::Active => "No active tasks.",
      TasksFilter::Completed => "No completed tasks.",
    }
  }
}
