use chrono::NaiveDate;
use tracing::{
  debug,
  info
};

use crate::calendar::{
  Calendar,
  CalendarMonth,
  DropOutcome,
  DuplicatePolicy
};
use crate::drag::DragPayload;
use crate::error::PlannerError;
use crate::event::CalendarEvent;
use crate::storage::{
  EVENTS_KEY,
  StoragePort,
  TASKS_KEY,
  load_collection,
  save_collection
};
use crate::task::{
  Task,
  TaskBook,
  TaskId
};

/// Root coordinator. It is the only reader and writer of storage: tasks and
/// events are loaded once in [`Planner::open`] and each collection is
/// rewritten in full after every change to it.
#[derive(Debug)]
pub struct Planner<S> {
  storage:  S,
  tasks:    TaskBook,
  calendar: Calendar
}

impl<S: StoragePort> Planner<S> {
  #[tracing::instrument(skip(storage))]
  pub fn open(
    storage: S,
    month: CalendarMonth,
    policy: DuplicatePolicy
  ) -> Self {
    let tasks = TaskBook::from_tasks(
      load_collection::<Task, _>(
        &storage, TASKS_KEY
      )
    );
    let events = load_collection::<
      CalendarEvent,
      _
    >(&storage, EVENTS_KEY);
    info!(
      tasks = tasks.len(),
      events = events.len(),
      "planner opened"
    );

    Self {
      storage,
      tasks,
      calendar: Calendar::new(
        month, policy, events
      )
    }
  }

  pub fn tasks(&self) -> &TaskBook {
    &self.tasks
  }

  pub fn calendar(&self) -> &Calendar {
    &self.calendar
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn into_storage(self) -> S {
    self.storage
  }

  #[tracing::instrument(skip(self))]
  pub fn add_task(
    &mut self,
    name: &str,
    now_ms: i64
  ) -> Result<Option<TaskId>, PlannerError>
  {
    let Some(id) =
      self.tasks.add(name, now_ms)
    else {
      debug!("blank task name; nothing added");
      return Ok(None);
    };
    info!(task_id = %id, "task added");
    self.persist_tasks()?;
    Ok(Some(id))
  }

  #[tracing::instrument(skip(self), fields(task_id = %id))]
  pub fn edit_task(
    &mut self,
    id: TaskId,
    name: &str
  ) -> Result<bool, PlannerError> {
    if !self.tasks.rename(id, name) {
      debug!("no rename applied");
      return Ok(false);
    }
    info!("task renamed");
    self.persist_tasks()?;
    Ok(true)
  }

  /// Deleting a task leaves its scheduled events in place.
  #[tracing::instrument(skip(self), fields(task_id = %id))]
  pub fn delete_task(
    &mut self,
    id: TaskId
  ) -> Result<bool, PlannerError> {
    if !self.tasks.remove(id) {
      debug!("no such task");
      return Ok(false);
    }
    info!("task deleted");
    self.persist_tasks()?;
    Ok(true)
  }

  pub fn drag_over(
    &mut self,
    date: NaiveDate
  ) -> bool {
    self.calendar.handle_drag_over(date)
  }

  pub fn drag_leave(&mut self) -> bool {
    self.calendar.handle_drag_leave()
  }

  /// Drop of raw drag data on the day cell for `date`.
  pub fn drop_on_day(
    &mut self,
    transfer: &str,
    date: NaiveDate
  ) -> Result<DropOutcome, PlannerError> {
    let outcome = self.calendar.handle_drop(
      transfer,
      date,
      &self.tasks
    );
    self.after_drop(outcome)
  }

  pub fn assign(
    &mut self,
    payload: DragPayload,
    date: NaiveDate
  ) -> Result<DropOutcome, PlannerError> {
    let outcome = self.calendar.assign(
      payload,
      date,
      &self.tasks
    );
    self.after_drop(outcome)
  }

  #[tracing::instrument(skip(self), fields(task_id = %id))]
  pub fn remove_event(
    &mut self,
    id: TaskId,
    date: NaiveDate
  ) -> Result<bool, PlannerError> {
    if !self.calendar.remove_event(id, date)
    {
      debug!("no matching event");
      return Ok(false);
    }
    info!("event removed");
    self.persist_events()?;
    Ok(true)
  }

  fn after_drop(
    &mut self,
    outcome: DropOutcome
  ) -> Result<DropOutcome, PlannerError> {
    if outcome.changed() {
      self.persist_events()?;
    }
    Ok(outcome)
  }

  fn persist_tasks(
    &mut self
  ) -> Result<(), PlannerError> {
    save_collection(
      &mut self.storage,
      TASKS_KEY,
      self.tasks.tasks()
    )?;
    Ok(())
  }

  fn persist_events(
    &mut self
  ) -> Result<(), PlannerError> {
    save_collection(
      &mut self.storage,
      EVENTS_KEY,
      self.calendar.events()
    )?;
    Ok(())
  }
}
