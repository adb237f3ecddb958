use std::collections::BTreeSet;
use std::fmt;

use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

use crate::error::PayloadError;

/// Task identifier: the creation time in milliseconds since the epoch.
///
/// Values are kept within the range a JSON number (an IEEE double) holds
/// exactly, so persisted ids survive any JSON reader unchanged.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct TaskId(i64);

impl TaskId {
  pub const MAX: i64 = 9_007_199_254_740_991;
  pub const MIN: i64 = 1;

  pub fn get(self) -> i64 {
    self.0
  }
}

impl TryFrom<i64> for TaskId {
  type Error = PayloadError;

  fn try_from(
    raw: i64
  ) -> Result<Self, Self::Error> {
    if (Self::MIN..=Self::MAX)
      .contains(&raw)
    {
      Ok(Self(raw))
    } else {
      Err(PayloadError::OutOfRange(raw))
    }
  }
}

impl From<TaskId> for i64 {
  fn from(id: TaskId) -> Self {
    id.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Task {
  pub id:   TaskId,
  pub name: String
}

/// A name is accepted only if something other than whitespace remains.
pub fn is_blank(name: &str) -> bool {
  name.trim().is_empty()
}

/// The task collection, in insertion order.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct TaskBook {
  tasks: Vec<Task>
}

impl TaskBook {
  pub fn from_tasks(
    tasks: Vec<Task>
  ) -> Self {
    Self { tasks }
  }

  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn get(
    &self,
    id: TaskId
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| task.id == id)
  }

  pub fn contains(
    &self,
    id: TaskId
  ) -> bool {
    self.get(id).is_some()
  }

  /// Picks the id for a task created at `now_ms`.
  ///
  /// Two tasks created within the same millisecond would collide, so a
  /// taken timestamp falls through to one past the largest id in use, or
  /// to the lowest free id once the largest is `TaskId::MAX`.
  pub fn allocate_id(
    &self,
    now_ms: i64
  ) -> TaskId {
    let candidate = TaskId(
      now_ms.clamp(
        TaskId::MIN,
        TaskId::MAX
      )
    );
    if !self.contains(candidate) {
      return candidate;
    }

    let max = self
      .tasks
      .iter()
      .map(|task| task.id.0)
      .max()
      .unwrap_or(0);
    let next = if max < TaskId::MAX {
      max + 1
    } else {
      self.lowest_free_id()
    };
    debug!(
      now_ms,
      next, "task id collision; bumping"
    );
    TaskId(next)
  }

  // The book holds far fewer than `TaskId::MAX` tasks, so a gap exists.
  fn lowest_free_id(&self) -> i64 {
    let used: BTreeSet<i64> = self
      .tasks
      .iter()
      .map(|task| task.id.0)
      .collect();
    (TaskId::MIN..=TaskId::MAX)
      .find(|id| !used.contains(id))
      .unwrap_or(TaskId::MIN)
  }

  /// Appends a new task unless `name` is blank. The name is stored as typed.
  pub fn add(
    &mut self,
    name: &str,
    now_ms: i64
  ) -> Option<TaskId> {
    if is_blank(name) {
      return None;
    }
    let id = self.allocate_id(now_ms);
    self.tasks.push(Task {
      id,
      name: name.to_string()
    });
    Some(id)
  }

  /// Replaces the name of task `id`. Returns whether anything changed.
  pub fn rename(
    &mut self,
    id: TaskId,
    name: &str
  ) -> bool {
    if is_blank(name) {
      return false;
    }
    match self
      .tasks
      .iter_mut()
      .find(|task| task.id == id)
    {
      | Some(task) => {
        task.name = name.to_string();
        true
      }
      | None => false
    }
  }

  pub fn remove(
    &mut self,
    id: TaskId
  ) -> bool {
    let before = self.tasks.len();
    self
      .tasks
      .retain(|task| task.id != id);
    self.tasks.len() != before
  }
}
