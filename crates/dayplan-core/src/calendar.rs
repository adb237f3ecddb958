use std::fmt;
use std::str::FromStr;

use chrono::{
  Datelike,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::drag::DragPayload;
use crate::error::{
  ConfigError,
  PayloadError
};
use crate::event::{
  CalendarEvent,
  EVENT_YEARS
};
use crate::task::{
  TaskBook,
  TaskId
};

pub const DUPLICATE_NOTICE: &str =
  "Task already exists for this day";

/// How a drop decides that a task is already scheduled on a day.
///
/// `DayOfMonth` compares only the day number, so an event on the 5th of
/// any month blocks the 5th of every other month. The grid only ever shows
/// one month, which is why this stays the default.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
  #[default]
  DayOfMonth,
  ExactDate
}

impl DuplicatePolicy {
  pub fn conflicts(
    self,
    existing: NaiveDate,
    candidate: NaiveDate
  ) -> bool {
    match self {
      | Self::DayOfMonth => {
        existing.day() == candidate.day()
      }
      | Self::ExactDate => {
        existing == candidate
      }
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::DayOfMonth => "day-of-month",
      | Self::ExactDate => "exact-date"
    }
  }
}

impl FromStr for DuplicatePolicy {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "day-of-month" => {
        Ok(Self::DayOfMonth)
      }
      | "exact-date" => Ok(Self::ExactDate),
      | other => {
        Err(format!(
          "unknown duplicate policy: \
           {other}"
        ))
      }
    }
  }
}

impl fmt::Display for DuplicatePolicy {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The month the grid shows and how many day cells it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
  year:  i32,
  month: u32,
  days:  u32
}

impl Default for CalendarMonth {
  fn default() -> Self {
    Self {
      year:  2024,
      month: 9,
      days:  30
    }
  }
}

impl CalendarMonth {
  pub fn new(
    year: i32,
    month: u32,
    days: u32
  ) -> Result<Self, ConfigError> {
    if !EVENT_YEARS.contains(&year) {
      return Err(
        ConfigError::InvalidCalendar(
          format!(
            "year {year} is outside {}..={}",
            EVENT_YEARS.start(),
            EVENT_YEARS.end()
          )
        )
      );
    }
    let length = days_in_month(year, month)
      .ok_or_else(|| {
        ConfigError::InvalidCalendar(
          format!(
            "{year}-{month:02} is not a \
             month"
          )
        )
      })?;
    if days == 0 || days > length {
      return Err(
        ConfigError::InvalidCalendar(
          format!(
            "{days} day cells do not fit \
             {year}-{month:02} ({length} \
             days)"
          )
        )
      );
    }
    Ok(Self { year, month, days })
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> u32 {
    self.month
  }

  pub fn days(&self) -> u32 {
    self.days
  }

  /// The date behind day cell `day` (1-based), if the grid has that cell.
  pub fn date(
    &self,
    day: u32
  ) -> Option<NaiveDate> {
    if day == 0 || day > self.days {
      return None;
    }
    NaiveDate::from_ymd_opt(
      self.year, self.month, day
    )
  }

  pub fn day_cells(
    &self
  ) -> impl Iterator<Item = NaiveDate> + '_
  {
    (1..=self.days)
      .filter_map(|day| self.date(day))
  }

  pub fn title(&self) -> String {
    self
      .date(1)
      .map(|first| {
        first.format("%B %Y").to_string()
      })
      .unwrap_or_default()
  }
}

fn days_in_month(
  year: i32,
  month: u32
) -> Option<u32> {
  let first =
    NaiveDate::from_ymd_opt(year, month, 1)?;
  let next = if month == 12 {
    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
  } else {
    NaiveDate::from_ymd_opt(
      year,
      month + 1,
      1
    )?
  };
  u32::try_from(
    next.signed_duration_since(first)
      .num_days()
  )
  .ok()
}

/// What a drop on a day cell did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
  Added(CalendarEvent),
  Duplicate,
  UnknownTask(TaskId),
  InvalidPayload(PayloadError)
}

impl DropOutcome {
  pub fn changed(&self) -> bool {
    matches!(self, Self::Added(_))
  }
}

/// Drop-target state: the scheduled events plus the hovered day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
  month:  CalendarMonth,
  policy: DuplicatePolicy,
  events: Vec<CalendarEvent>,
  hover:  Option<NaiveDate>
}

impl Calendar {
  pub fn new(
    month: CalendarMonth,
    policy: DuplicatePolicy,
    events: Vec<CalendarEvent>
  ) -> Self {
    Self {
      month,
      policy,
      events,
      hover: None
    }
  }

  pub fn month(&self) -> CalendarMonth {
    self.month
  }

  pub fn policy(&self) -> DuplicatePolicy {
    self.policy
  }

  pub fn events(&self) -> &[CalendarEvent] {
    &self.events
  }

  pub fn hovered(&self) -> Option<NaiveDate> {
    self.hover
  }

  /// Events shown in the cell for `date`. Cells match on day of month.
  pub fn events_on(
    &self,
    date: NaiveDate
  ) -> impl Iterator<Item = &CalendarEvent> + '_
  {
    let day = date.day();
    self
      .events
      .iter()
      .filter(move |event| event.day() == day)
  }

  /// Marks `date` as the drop target. Returns whether the target moved.
  pub fn handle_drag_over(
    &mut self,
    date: NaiveDate
  ) -> bool {
    let changed = self.hover != Some(date);
    self.hover = Some(date);
    changed
  }

  pub fn handle_drag_leave(
    &mut self
  ) -> bool {
    self.hover.take().is_some()
  }

  pub fn has_conflict(
    &self,
    id: TaskId,
    date: NaiveDate
  ) -> bool {
    self.events.iter().any(|event| {
      event.id == id
        && self
          .policy
          .conflicts(event.date, date)
    })
  }

  /// Drop of the raw drag data `transfer` on the cell for `date`.
  #[tracing::instrument(skip(self, tasks))]
  pub fn handle_drop(
    &mut self,
    transfer: &str,
    date: NaiveDate,
    tasks: &TaskBook
  ) -> DropOutcome {
    self.hover = None;
    match DragPayload::parse(transfer) {
      | Ok(payload) => {
        self.assign(payload, date, tasks)
      }
      | Err(error) => {
        warn!(%error, "ignoring drop with invalid payload");
        DropOutcome::InvalidPayload(error)
      }
    }
  }

  /// Schedules the dragged task on `date` unless it already is.
  pub fn assign(
    &mut self,
    payload: DragPayload,
    date: NaiveDate,
    tasks: &TaskBook
  ) -> DropOutcome {
    let id = payload.dragged_task_id;
    let Some(task) = tasks.get(id) else {
      warn!(task_id = %id, "dropped task no longer exists");
      return DropOutcome::UnknownTask(id);
    };

    if self.has_conflict(id, date) {
      info!(
        task_id = %id,
        %date,
        policy = %self.policy,
        "task already scheduled on this day"
      );
      return DropOutcome::Duplicate;
    }

    let event =
      CalendarEvent::snapshot(task, date);
    debug!(task_id = %id, %date, "scheduled task");
    self.events.push(event.clone());
    DropOutcome::Added(event)
  }

  /// Removes the event for task `id` on exactly `date`.
  pub fn remove_event(
    &mut self,
    id: TaskId,
    date: NaiveDate
  ) -> bool {
    match self.events.iter().position(
      |event| {
        event.id == id && event.date == date
      }
    ) {
      | Some(index) => {
        self.events.remove(index);
        true
      }
      | None => false
    }
  }
}
