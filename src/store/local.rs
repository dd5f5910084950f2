//! SQLite-backed local task store.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::TaskStore;
use crate::db::Database;
use crate::tasks::Task;

/// Durable task store on top of the local SQLite database.
///
/// Every operation runs on tokio's blocking pool so callers never wait on disk
/// from an async worker.
#[derive(Clone)]
pub struct LocalTaskStore {
  db: Arc<Mutex<Database>>,
}

impl LocalTaskStore {
  pub fn new(db: Database) -> Self {
    Self {
      db: Arc::new(Mutex::new(db)),
    }
  }

  /// Run `op` against the database on the blocking pool.
  async fn with_db<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
  {
    let db = Arc::clone(&self.db);
    tokio::task::spawn_blocking(move || {
      let db = db.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
      op(&db)
    })
    .await
    .map_err(|e| eyre!("Local store task failed: {}", e))?
  }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
  Ok(Task {
    id: row.get(0)?,
    title: row.get(1)?,
    description: row.get(2)?,
    completed: row.get(3)?,
  })
}

#[async_trait]
impl TaskStore for LocalTaskStore {
  fn name(&self) -> &str {
    "local"
  }

  async fn get_tasks(&self) -> Result<Option<Vec<Task>>> {
    let tasks = self
      .with_db(|db| {
        let mut stmt = db
          .conn()
          .prepare("SELECT id, title, description, is_completed FROM tasks ORDER BY rowid")
          .map_err(|e| eyre!("Failed to prepare query: {}", e))?;

        let tasks = stmt
          .query_map([], task_from_row)
          .map_err(|e| eyre!("Failed to query tasks: {}", e))?
          .collect::<rusqlite::Result<Vec<Task>>>()
          .map_err(|e| eyre!("Failed to read task row: {}", e))?;

        Ok(tasks)
      })
      .await?;

    debug!(count = tasks.len(), "Loaded tasks from local store");

    // An empty table means there is nothing to serve
    if tasks.is_empty() {
      Ok(None)
    } else {
      Ok(Some(tasks))
    }
  }

  async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
    let task_id = task_id.to_string();
    self
      .with_db(move |db| {
        db.conn()
          .query_row(
            "SELECT id, title, description, is_completed FROM tasks WHERE id = ?",
            params![task_id],
            task_from_row,
          )
          .optional()
          .map_err(|e| eyre!("Failed to get task {}: {}", task_id, e))
      })
      .await
  }

  async fn save_task(&self, task: &Task) -> Result<()> {
    let task = task.clone();
    self
      .with_db(move |db| {
        // Upsert keeps the rowid, so list order survives updates
        db.conn()
          .execute(
            "INSERT INTO tasks (id, title, description, is_completed) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               title = excluded.title,
               description = excluded.description,
               is_completed = excluded.is_completed",
            params![task.id, task.title, task.description, task.completed],
          )
          .map_err(|e| eyre!("Failed to save task {}: {}", task.id, e))?;
        Ok(())
      })
      .await
  }

  async fn set_completed(&self, task: &Task, completed: bool) -> Result<()> {
    let task_id = task.id.clone();
    self
      .with_db(move |db| {
        db.conn()
          .execute(
            "UPDATE tasks SET is_completed = ? WHERE id = ?",
            params![completed, task_id],
          )
          .map_err(|e| eyre!("Failed to update task {}: {}", task_id, e))?;
        Ok(())
      })
      .await
  }

  async fn clear_completed_tasks(&self) -> Result<()> {
    self
      .with_db(|db| {
        db.conn()
          .execute("DELETE FROM tasks WHERE is_completed = 1", [])
          .map_err(|e| eyre!("Failed to clear completed tasks: {}", e))?;
        Ok(())
      })
      .await
  }

  async fn delete_all_tasks(&self) -> Result<()> {
    self
      .with_db(|db| {
        db.conn()
          .execute("DELETE FROM tasks", [])
          .map_err(|e| eyre!("Failed to delete tasks: {}", e))?;
        Ok(())
      })
      .await
  }

  async fn delete_task(&self, task_id: &str) -> Result<()> {
    let task_id = task_id.to_string();
    self
      .with_db(move |db| {
        db.conn()
          .execute("DELETE FROM tasks WHERE id = ?", params![task_id])
          .map_err(|e| eyre!("Failed to delete task {}: {}", task_id, e))?;
        Ok(())
      })
      .await
  }
}
