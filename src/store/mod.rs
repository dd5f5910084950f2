//! Backing stores for tasks.
//!
//! Both the durable local store and the remote service implement [`TaskStore`].
//! Reads answer `Ok(None)` when the store has no usable data ("not available");
//! an `Err` is a store failure, which callers may treat the same way.

mod local;
mod remote;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use color_eyre::Result;

use crate::tasks::Task;

pub use local::LocalTaskStore;
pub use remote::RemoteTaskStore;

/// Read/write access to a collection of tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
  /// Short label for logs and error reports (e.g., "local", "remote")
  fn name(&self) -> &str;

  /// Every task held by the store, or `None` when nothing is available.
  async fn get_tasks(&self) -> Result<Option<Vec<Task>>>;

  /// A single task by id, or `None` when it is not available.
  async fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

  /// Insert or replace the task with its full state.
  async fn save_task(&self, task: &Task) -> Result<()>;

  /// Update only the completion flag of the task with `task.id`.
  async fn set_completed(&self, task: &Task, completed: bool) -> Result<()>;

  /// Delete every completed task.
  async fn clear_completed_tasks(&self) -> Result<()>;

  /// Delete every task.
  async fn delete_all_tasks(&self) -> Result<()>;

  /// Delete a task by id. Unknown ids are ignored.
  async fn delete_task(&self, task_id: &str) -> Result<()>;

  /// Mark any collection-level cache held by the store as stale.
  #[allow(dead_code)]
  fn refresh_tasks(&self) {}
}
