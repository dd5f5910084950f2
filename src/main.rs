mod commands;
mod config;
mod db;
mod repository;
mod store;
mod tasks;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::config::Config;
use crate::db::Database;
use crate::repository::{TasksHandle, TasksRepository};
use crate::store::{LocalTaskStore, RemoteTaskStore};

#[derive(Parser, Debug)]
#[command(name = "tasks")]
#[command(about = "A todo list kept in sync between a local database and a remote service")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/tasks/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Treat the remote service as unreachable
  #[arg(long)]
  offline: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _log_guard = init_logging(&config)?;

  let local = LocalTaskStore::new(Database::open(config.database_path.as_deref())?);
  let remote = if config.remote.seed {
    RemoteTaskStore::seeded(config.remote.latency())
  } else {
    RemoteTaskStore::new(config.remote.latency())
  };
  remote.set_offline(args.offline || config.remote.offline);

  let (tasks, worker) = TasksHandle::spawn(TasksRepository::new(local, remote));

  let result = args.command.unwrap_or_default().run(&tasks).await;

  tasks.shutdown()?;
  worker.await?;

  result
}

/// Send tracing output to tasks.log so stdout only carries command output.
///
/// `TASKS_LOG` overrides the configured filter.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
  let dir = config.log_directory()?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, "tasks.log"));

  let filter = EnvFilter::try_from_env("TASKS_LOG")
    .or_else(|_| EnvFilter::try_new(config.log.filter.as_deref().unwrap_or("info")))?;

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
