use thiserror::Error;

/// Errors surfaced by the task repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
  /// Neither the cache nor any store could provide the requested data.
  #[error("tasks are not available")]
  NotAvailable,

  /// An id-only write named a task that is not in the cache.
  #[error("task {0} not found")]
  NotFound(String),

  /// At least one store rejected a write. The remaining steps still ran.
  #[error("{operation} failed: {}", .failures.join("; "))]
  WriteFailed {
    operation: &'static str,
    failures: Vec<String>,
  },

  /// The repository task is no longer running.
  #[error("task repository has shut down")]
  Closed,
}
