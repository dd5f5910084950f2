use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single unit of work on the todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
  pub id: String,
  pub title: String,
  pub description: String,
  pub completed: bool,
}

impl Task {
  /// Create a new, active task with a freshly generated id.
  pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self::with_completed(title, description, false)
  }

  /// Create a new task with an explicit completion flag.
  pub fn with_completed(
    title: impl Into<String>,
    description: impl Into<String>,
    completed: bool,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      title: title.into(),
      description: description.into(),
      completed,
    }
  }

  /// Create an active task under a known id.
  pub fn with_id(
    id: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      ..Self::new(title, description)
    }
  }

  /// Title shown in lists; falls back to the description when the title is empty.
  pub fn display_title(&self) -> &str {
    if self.title.is_empty() {
      &self.description
    } else {
      &self.title
    }
  }

  pub fn is_active(&self) -> bool {
    !self.completed
  }

  /// Copy of this task with the completion flag replaced.
  pub fn with_completion(&self, completed: bool) -> Self {
    Self {
      completed,
      ..self.clone()
    }
  }
}

/// A task given either in full or by id.
///
/// The id form is resolved through the repository cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
  Task(Task),
  Id(String),
}

impl TaskRef {
  pub fn id(&self) -> &str {
    match self {
      TaskRef::Task(task) => &task.id,
      TaskRef::Id(id) => id,
    }
  }
}

impl From<Task> for TaskRef {
  fn from(task: Task) -> Self {
    TaskRef::Task(task)
  }
}

impl From<&Task> for TaskRef {
  fn from(task: &Task) -> Self {
    TaskRef::Task(task.clone())
  }
}

impl From<String> for TaskRef {
  fn from(id: String) -> Self {
    TaskRef::Id(id)
  }
}

impl From<&str> for TaskRef {
  fn from(id: &str) -> Self {
    TaskRef::Id(id.to_string())
  }
}
