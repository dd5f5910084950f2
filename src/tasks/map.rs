//! Insertion-ordered map of tasks keyed by id.

use std::collections::HashMap;

use super::types::Task;

/// Tasks keyed by id, iterated in insertion order.
///
/// Overwriting an existing id keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct TaskMap {
  order: Vec<String>,
  entries: HashMap<String, Task>,
}

impl TaskMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, id: &str) -> Option<&Task> {
    self.entries.get(id)
  }

  #[cfg(test)]
  pub fn contains(&self, id: &str) -> bool {
    self.entries.contains_key(id)
  }

  /// Insert or replace a task.
  pub fn insert(&mut self, task: Task) {
    if !self.entries.contains_key(&task.id) {
      self.order.push(task.id.clone());
    }
    self.entries.insert(task.id.clone(), task);
  }

  pub fn remove(&mut self, id: &str) -> Option<Task> {
    let removed = self.entries.remove(id)?;
    self.order.retain(|key| key != id);
    Some(removed)
  }

  /// Drop every task for which `keep` returns false.
  pub fn retain(&mut self, mut keep: impl FnMut(&Task) -> bool) {
    let entries = &mut self.entries;
    self.order.retain(|id| {
      let kept = entries.get(id).is_some_and(&mut keep);
      if !kept {
        entries.remove(id);
      }
      kept
    });
  }

  pub fn clear(&mut self) {
    self.order.clear();
    self.entries.clear();
  }

  /// Replace the whole content, keeping the order of `tasks`.
  pub fn replace_all(&mut self, tasks: &[Task]) {
    self.clear();
    for task in tasks {
      self.insert(task.clone());
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &Task> {
    self.order.iter().filter_map(|id| self.entries.get(id))
  }

  /// Snapshot of all tasks in order.
  pub fn values(&self) -> Vec<Task> {
    self.iter().cloned().collect()
  }
}
