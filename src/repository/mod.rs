//! Task repository: an in-memory cache in front of the local and remote stores.
//!
//! Reads go cache → local → remote and stop at the first source with data.
//! Writes go to the local store, then the remote store, then the cache.
//! The repository is owned by a single task; see [`TasksHandle`] for shared
//! access.

mod error;
mod handle;

use color_eyre::Result;
use tracing::{debug, info, warn};

use crate::store::TaskStore;
use crate::tasks::{Task, TaskMap, TaskRef};

pub use error::RepositoryError;
pub use handle::TasksHandle;

/// Cache plus fallback/fan-out logic over two task stores.
pub struct TasksRepository<L, R> {
  local: L,
  remote: R,
  cached_tasks: TaskMap,
  /// Forces the next full read to go straight to the remote store
  cache_is_dirty: bool,
}

impl<L: TaskStore, R: TaskStore> TasksRepository<L, R> {
  pub fn new(local: L, remote: R) -> Self {
    Self {
      local,
      remote,
      cached_tasks: TaskMap::new(),
      cache_is_dirty: false,
    }
  }

  /// Get every task.
  ///
  /// 1. Cache populated and clean - return it without touching any store
  /// 2. Cache dirty - skip the local store and ask the remote store
  /// 3. Otherwise try the local store, falling back to the remote store
  ///
  /// A remote hit replaces the cache and rewrites the local store.
  pub async fn get_tasks(&mut self) -> Result<Vec<Task>, RepositoryError> {
    if !self.cached_tasks.is_empty() && !self.cache_is_dirty {
      debug!(count = self.cached_tasks.len(), "Serving tasks from cache");
      return Ok(self.cached_tasks.values());
    }

    if !self.cache_is_dirty {
      if let Some(tasks) = fetch_tasks(&self.local).await {
        self.refresh_cache(&tasks);
        return Ok(self.cached_tasks.values());
      }
    }

    self.get_tasks_from_remote().await
  }

  async fn get_tasks_from_remote(&mut self) -> Result<Vec<Task>, RepositoryError> {
    let tasks = fetch_tasks(&self.remote)
      .await
      .ok_or(RepositoryError::NotAvailable)?;

    info!(count = tasks.len(), "Loaded tasks from remote store");
    self.refresh_cache(&tasks);
    self.refresh_local_store(&tasks).await;

    Ok(tasks)
  }

  fn refresh_cache(&mut self, tasks: &[Task]) {
    self.cached_tasks.replace_all(tasks);
    self.cache_is_dirty = false;
  }

  /// Make the local store mirror `tasks`. Failures are logged only.
  async fn refresh_local_store(&self, tasks: &[Task]) {
    if let Err(e) = self.local.delete_all_tasks().await {
      warn!(store = self.local.name(), error = %e, "Failed to clear store during sync");
    }
    for task in tasks {
      if let Err(e) = self.local.save_task(task).await {
        warn!(store = self.local.name(), task_id = %task.id, error = %e, "Failed to sync task");
      }
    }
  }

  /// Get a single task by id: cache, then local store, then remote store.
  ///
  /// A miss only ever touches this one cache entry.
  pub async fn get_task(&mut self, task_id: &str) -> Result<Task, RepositoryError> {
    if let Some(task) = self.cached_tasks.get(task_id) {
      return Ok(task.clone());
    }

    let task = match fetch_task(&self.local, task_id).await {
      Some(task) => task,
      None => fetch_task(&self.remote, task_id)
        .await
        .ok_or(RepositoryError::NotAvailable)?,
    };

    self.cached_tasks.insert(task.clone());
    Ok(task)
  }

  pub async fn save_task(&mut self, task: Task) -> Result<(), RepositoryError> {
    let local = self.local.save_task(&task).await;
    let remote = self.remote.save_task(&task).await;
    self.cached_tasks.insert(task);

    self.check_writes("save task", local, remote)
  }

  pub async fn complete_task(&mut self, task: impl Into<TaskRef>) -> Result<(), RepositoryError> {
    let task = self.resolve(task.into())?;
    self.set_completed(task, true).await
  }

  pub async fn activate_task(&mut self, task: impl Into<TaskRef>) -> Result<(), RepositoryError> {
    let task = self.resolve(task.into())?;
    self.set_completed(task, false).await
  }

  /// Set the completion flag in both stores, then cache the updated copy.
  pub async fn set_completed(&mut self, task: Task, completed: bool) -> Result<(), RepositoryError> {
    let local = self.local.set_completed(&task, completed).await;
    let remote = self.remote.set_completed(&task, completed).await;
    self.cached_tasks.insert(task.with_completion(completed));

    let operation = if completed {
      "complete task"
    } else {
      "activate task"
    };
    self.check_writes(operation, local, remote)
  }

  /// Turn a task reference into a full task, looking bare ids up in the cache.
  fn resolve(&self, task: TaskRef) -> Result<Task, RepositoryError> {
    match task {
      TaskRef::Task(task) => Ok(task),
      TaskRef::Id(id) => self
        .cached_tasks
        .get(&id)
        .cloned()
        .ok_or(RepositoryError::NotFound(id)),
    }
  }

  pub async fn clear_completed_tasks(&mut self) -> Result<(), RepositoryError> {
    let local = self.local.clear_completed_tasks().await;
    let remote = self.remote.clear_completed_tasks().await;
    self.cached_tasks.retain(Task::is_active);

    self.check_writes("clear completed tasks", local, remote)
  }

  pub async fn delete_all_tasks(&mut self) -> Result<(), RepositoryError> {
    let local = self.local.delete_all_tasks().await;
    let remote = self.remote.delete_all_tasks().await;
    self.cached_tasks.clear();

    self.check_writes("delete all tasks", local, remote)
  }

  pub async fn delete_task(&mut self, task_id: &str) -> Result<(), RepositoryError> {
    let local = self.local.delete_task(task_id).await;
    let remote = self.remote.delete_task(task_id).await;
    self.cached_tasks.remove(task_id);

    self.check_writes("delete task", local, remote)
  }

  /// Mark the cache dirty so the next `get_tasks` goes to the remote store.
  pub fn refresh_tasks(&mut self) {
    self.cache_is_dirty = true;
  }

  /// Drop all cached state.
  pub fn reset(&mut self) {
    self.cached_tasks.clear();
    self.cache_is_dirty = false;
  }

  #[cfg(test)]
  pub fn cached_tasks(&self) -> &TaskMap {
    &self.cached_tasks
  }

  #[cfg(test)]
  pub fn is_cache_dirty(&self) -> bool {
    self.cache_is_dirty
  }

  fn check_writes(
    &self,
    operation: &'static str,
    local: Result<()>,
    remote: Result<()>,
  ) -> Result<(), RepositoryError> {
    let failures: Vec<String> = [(self.local.name(), local), (self.remote.name(), remote)]
      .into_iter()
      .filter_map(|(store, result)| {
        let e = result.err()?;
        warn!(store, operation, error = %e, "Store write failed");
        Some(format!("{}: {}", store, e))
      })
      .collect();

    if failures.is_empty() {
      Ok(())
    } else {
      Err(RepositoryError::WriteFailed {
        operation,
        failures,
      })
    }
  }
}

/// Read every task from `store`, treating a store failure as "not available".
async fn fetch_tasks<S: TaskStore>(store: &S) -> Option<Vec<Task>> {
  match store.get_tasks().await {
    Ok(tasks) => {
      if tasks.is_none() {
        debug!(store = store.name(), "No tasks available");
      }
      tasks
    }
    Err(e) => {
      warn!(store = store.name(), error = %e, "Failed to load tasks");
      None
    }
  }
}

async fn fetch_task<S: TaskStore>(store: &S, task_id: &str) -> Option<Task> {
  match store.get_task(task_id).await {
    Ok(task) => task,
    Err(e) => {
      warn!(store = store.name(), task_id, error = %e, "Failed to load task");
      None
    }
  }
}
