//! Simulated remote task service.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use super::TaskStore;
use crate::tasks::{Task, TaskMap};

const SEED_TASKS: [(&str, &str, &str); 2] = [
  (
    "5c1e7a3e-8d1f-4f4b-9a4e-3f6b2d9c1a01",
    "Build tower in Pisa",
    "Ground looks good, no foundation work required.",
  ),
  (
    "5c1e7a3e-8d1f-4f4b-9a4e-3f6b2d9c1a02",
    "Finish bridge in Tacoma",
    "Found awesome girders at half the cost!",
  ),
];

/// In-memory stand-in for the backend service.
///
/// Reads are delayed by a fixed latency; writes apply immediately. While
/// offline, every read answers "not available".
pub struct RemoteTaskStore {
  tasks: Mutex<TaskMap>,
  latency: Duration,
  offline: AtomicBool,
}

impl RemoteTaskStore {
  /// Create an empty service with the given read latency.
  pub fn new(latency: Duration) -> Self {
    Self {
      tasks: Mutex::new(TaskMap::new()),
      latency,
      offline: AtomicBool::new(false),
    }
  }

  /// Create a service holding the two example tasks.
  ///
  /// The example tasks keep the same ids across runs, so reloading from a
  /// fresh service does not duplicate them in the local store.
  pub fn seeded(latency: Duration) -> Self {
    let store = Self::new(latency);
    if let Ok(mut tasks) = store.tasks.lock() {
      for (id, title, description) in SEED_TASKS {
        tasks.insert(Task::with_id(id, title, description));
      }
    }
    store
  }

  /// Toggle simulated network unavailability.
  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  fn is_offline(&self) -> bool {
    self.offline.load(Ordering::SeqCst)
  }

  fn lock(&self) -> Result<MutexGuard<'_, TaskMap>> {
    self.tasks.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }

  /// Wait out the simulated service latency.
  async fn round_trip(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
  fn name(&self) -> &str {
    "remote"
  }

  async fn get_tasks(&self) -> Result<Option<Vec<Task>>> {
    self.round_trip().await;
    if self.is_offline() {
      debug!("Remote service offline");
      return Ok(None);
    }
    Ok(Some(self.lock()?.values()))
  }

  async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
    self.round_trip().await;
    if self.is_offline() {
      debug!(task_id, "Remote service offline");
      return Ok(None);
    }
    Ok(self.lock()?.get(task_id).cloned())
  }

  async fn save_task(&self, task: &Task) -> Result<()> {
    self.lock()?.insert(task.clone());
    Ok(())
  }

  async fn set_completed(&self, task: &Task, completed: bool) -> Result<()> {
    let mut tasks = self.lock()?;
    if let Some(existing) = tasks.get(&task.id) {
      let updated = existing.with_completion(completed);
      tasks.insert(updated);
    }
    Ok(())
  }

  async fn clear_completed_tasks(&self) -> Result<()> {
    self.lock()?.retain(|task| !task.completed);
    Ok(())
  }

  async fn delete_all_tasks(&self) -> Result<()> {
    self.lock()?.clear();
    Ok(())
  }

  async fn delete_task(&self, task_id: &str) -> Result<()> {
    self.lock()?.remove(task_id);
    Ok(())
  }
}
