//! Recording store for repository tests.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::TaskStore;
use crate::tasks::Task;

/// A call made against a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  GetTasks,
  GetTask(String),
  SaveTask(Task),
  SetCompleted(Task, bool),
  ClearCompleted,
  DeleteAll,
  DeleteTask(String),
}

/// Store that records every call and answers reads from a scripted list.
///
/// Writes are only recorded; they never change what reads return. Clones
/// share state, so a test can keep one after handing the store over.
#[derive(Clone)]
pub struct RecordingStore {
  name: &'static str,
  calls: Arc<Mutex<Vec<Call>>>,
  tasks: Arc<Mutex<Option<Vec<Task>>>>,
  fail_writes: Arc<AtomicBool>,
  fail_reads: Arc<AtomicBool>,
}

impl RecordingStore {
  /// A store whose reads are all "not available".
  pub fn unavailable(name: &'static str) -> Self {
    Self {
      name,
      calls: Arc::default(),
      tasks: Arc::default(),
      fail_writes: Arc::default(),
      fail_reads: Arc::default(),
    }
  }

  /// A store whose reads answer from `tasks`.
  pub fn with_tasks(name: &'static str, tasks: Vec<Task>) -> Self {
    let store = Self::unavailable(name);
    store.set_tasks(Some(tasks));
    store
  }

  pub fn set_tasks(&self, tasks: Option<Vec<Task>>) {
    *self.tasks.lock().unwrap() = tasks;
  }

  /// Make every write fail from now on.
  pub fn fail_writes(&self) {
    self.fail_writes.store(true, Ordering::SeqCst);
  }

  /// Make every read fail from now on.
  pub fn fail_reads(&self) {
    self.fail_reads.store(true, Ordering::SeqCst);
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
    self.calls.lock().unwrap().iter().filter(|c| matches(*c)).count()
  }

  pub fn clear_calls(&self) {
    self.calls.lock().unwrap().clear();
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }

  fn write(&self, call: Call) -> Result<()> {
    self.record(call);
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(eyre!("{} store rejected the write", self.name));
    }
    Ok(())
  }

  fn read(&self, call: Call) -> Result<()> {
    self.record(call);
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(eyre!("{} store failed to read", self.name));
    }
    Ok(())
  }
}

#[async_trait]
impl TaskStore for RecordingStore {
  fn name(&self) -> &str {
    self.name
  }

  async fn get_tasks(&self) -> Result<Option<Vec<Task>>> {
    self.read(Call::GetTasks)?;
    Ok(self.tasks.lock().unwrap().clone())
  }

  async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
    self.read(Call::GetTask(task_id.to_string()))?;
    let tasks = self.tasks.lock().unwrap();
    Ok(
      tasks
        .as_ref()
        .and_then(|tasks| tasks.iter().find(|t| t.id == task_id).cloned()),
    )
  }

  async fn save_task(&self, task: &Task) -> Result<()> {
    self.write(Call::SaveTask(task.clone()))
  }

  async fn set_completed(&self, task: &Task, completed: bool) -> Result<()> {
    self.write(Call::SetCompleted(task.clone(), completed))
  }

  async fn clear_completed_tasks(&self) -> Result<()> {
    self.write(Call::ClearCompleted)
  }

  async fn delete_all_tasks(&self) -> Result<()> {
    self.write(Call::DeleteAll)
  }

  async fn delete_task(&self, task_id: &str) -> Result<()> {
    self.write(Call::DeleteTask(task_id.to_string()))
  }
}
