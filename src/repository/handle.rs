//! Actor wrapper that confines a repository to a single tokio task.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{RepositoryError, TasksRepository};
use crate::store::TaskStore;
use crate::tasks::{Task, TaskRef};

type Reply<T> = oneshot::Sender<Result<T, RepositoryError>>;

/// Requests served by the repository task
enum Request {
  GetTasks(Reply<Vec<Task>>),
  GetTask(String, Reply<Task>),
  SaveTask(Task, Reply<()>),
  SetCompleted(TaskRef, bool, Reply<()>),
  ClearCompletedTasks(Reply<()>),
  DeleteAllTasks(Reply<()>),
  DeleteTask(String, Reply<()>),
  RefreshTasks(Reply<()>),
  Reset(Reply<()>),
  Shutdown,
}

/// Cloneable handle to a repository running on its own task.
///
/// Requests are served one at a time in arrival order, so the cache never
/// sees concurrent mutation.
#[derive(Clone)]
pub struct TasksHandle {
  tx: mpsc::UnboundedSender<Request>,
}

impl TasksHandle {
  /// Move `repository` onto a new task and return a handle to it.
  ///
  /// The join handle yields the repository back once the task stops, either
  /// after [`TasksHandle::shutdown`] or when every handle is dropped.
  pub fn spawn<L, R>(repository: TasksRepository<L, R>) -> (Self, JoinHandle<TasksRepository<L, R>>)
  where
    L: TaskStore + 'static,
    R: TaskStore + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(serve(repository, rx));
    (Self { tx }, worker)
  }

  pub async fn get_tasks(&self) -> Result<Vec<Task>, RepositoryError> {
    self.request(Request::GetTasks).await
  }

  pub async fn get_task(&self, task_id: &str) -> Result<Task, RepositoryError> {
    let task_id = task_id.to_string();
    self.request(|reply| Request::GetTask(task_id, reply)).await
  }

  pub async fn save_task(&self, task: Task) -> Result<(), RepositoryError> {
    self.request(|reply| Request::SaveTask(task, reply)).await
  }

  pub async fn complete_task(&self, task: impl Into<TaskRef>) -> Result<(), RepositoryError> {
    let task = task.into();
    self
      .request(|reply| Request::SetCompleted(task, true, reply))
      .await
  }

  pub async fn activate_task(&self, task: impl Into<TaskRef>) -> Result<(), RepositoryError> {
    let task = task.into();
    self
      .request(|reply| Request::SetCompleted(task, false, reply))
      .await
  }

  pub async fn clear_completed_tasks(&self) -> Result<(), RepositoryError> {
    self.request(Request::ClearCompletedTasks).await
  }

  pub async fn delete_all_tasks(&self) -> Result<(), RepositoryError> {
    self.request(Request::DeleteAllTasks).await
  }

  pub async fn delete_task(&self, task_id: &str) -> Result<(), RepositoryError> {
    let task_id = task_id.to_string();
    self
      .request(|reply| Request::DeleteTask(task_id, reply))
      .await
  }

  /// Force the next `get_tasks` to go to the remote store.
  pub async fn refresh_tasks(&self) -> Result<(), RepositoryError> {
    self.request(Request::RefreshTasks).await
  }

  /// Drop the repository's cached state.
  #[allow(dead_code)]
  pub async fn reset(&self) -> Result<(), RepositoryError> {
    self.request(Request::Reset).await
  }

  /// Stop the repository task once the requests already queued are served.
  pub fn shutdown(&self) -> Result<(), RepositoryError> {
    self
      .tx
      .send(Request::Shutdown)
      .map_err(|_| RepositoryError::Closed)
  }

  async fn request<T>(
    &self,
    build: impl FnOnce(Reply<T>) -> Request,
  ) -> Result<T, RepositoryError> {
    let (reply, rx) = oneshot::channel();
    self
      .tx
      .send(build(reply))
      .map_err(|_| RepositoryError::Closed)?;
    // Sender dropped without answering - the task went away mid-request
    rx.await.map_err(|_| RepositoryError::Closed)?
  }
}

async fn serve<L, R>(
  mut repository: TasksRepository<L, R>,
  mut rx: mpsc::UnboundedReceiver<Request>,
) -> TasksRepository<L, R>
where
  L: TaskStore,
  R: TaskStore,
{
  // Send errors mean the caller stopped waiting; the result is discarded
  while let Some(request) = rx.recv().await {
    match request {
      Request::GetTasks(reply) => {
        let _ = reply.send(repository.get_tasks().await);
      }
      Request::GetTask(task_id, reply) => {
        let _ = reply.send(repository.get_task(&task_id).await);
      }
      Request::SaveTask(task, reply) => {
        let _ = reply.send(repository.save_task(task).await);
      }
      Request::SetCompleted(task, completed, reply) => {
        debug!(task_id = task.id(), completed, "Setting task completion");
        let result = if completed {
          repository.complete_task(task).await
        } else {
          repository.activate_task(task).await
        };
        let _ = reply.send(result);
      }
      Request::ClearCompletedTasks(reply) => {
        let _ = reply.send(repository.clear_completed_tasks().await);
      }
      Request::DeleteAllTasks(reply) => {
        let _ = reply.send(repository.delete_all_tasks().await);
      }
      Request::DeleteTask(task_id, reply) => {
        let _ = reply.send(repository.delete_task(&task_id).await);
      }
      Request::RefreshTasks(reply) => {
        repository.refresh_tasks();
        let _ = reply.send(Ok(()));
      }
      Request::Reset(reply) => {
        repository.reset();
        let _ = reply.send(Ok(()));
      }
      Request::Shutdown => break,
    }
  }

  debug!("Task repository stopped");
  repository
}
