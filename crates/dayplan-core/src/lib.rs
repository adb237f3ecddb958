//! Domain state for the dayplan task planner.
//!
//! A [`Planner`] owns a [`StoragePort`], the task collection
//! ([`TaskBook`]) and the drop-target calendar ([`Calendar`]). Front ends
//! forward user interactions to it and re-render from its state.

pub mod calendar;
pub mod config;
pub mod drag;
pub mod error;
pub mod event;
pub mod planner;
pub mod storage;
pub mod task;
pub mod task_list;

pub use calendar::{
  Calendar,
  CalendarMonth,
  DUPLICATE_NOTICE,
  DropOutcome,
  DuplicatePolicy
};
pub use config::Config;
pub use drag::{
  DRAG_DATA_KEY,
  DragPayload
};
pub use error::{
  ConfigError,
  PayloadError,
  PlannerError,
  StorageError
};
pub use event::CalendarEvent;
pub use planner::Planner;
pub use storage::{
  EVENTS_KEY,
  MemoryStorage,
  StoragePort,
  TASKS_KEY
};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use task::{
  Task,
  TaskBook,
  TaskId
};
pub use task_list::TaskListState;
