use std::io::{
  self,
  Write
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use chrono::NaiveDate;
use dayplan_core::{
  DUPLICATE_NOTICE,
  DropOutcome,
  Planner,
  StoragePort,
  TaskId
};
use tracing::{
  debug,
  instrument
};

use crate::cli::Command;
use crate::render::Renderer;

#[instrument(skip(planner, renderer, command, now_ms))]
pub fn dispatch<S: StoragePort>(
  planner: &mut Planner<S>,
  renderer: &mut Renderer,
  command: Command,
  now_ms: i64
) -> anyhow::Result<()> {
  debug!(?command, "dispatching command");
  let mut out = io::stdout().lock();

  match command {
    | Command::Add { name } => {
      cmd_add(planner, &mut out, &name.join(" "), now_ms)
    }
    | Command::Edit { id, name } => {
      cmd_edit(planner, &mut out, id, &name.join(" "))
    }
    | Command::Delete { id } => {
      cmd_delete(planner, &mut out, id)
    }
    | Command::List => {
      renderer
        .write_task_table(
          &mut out,
          planner.tasks().tasks()
        )
        .context("failed writing task list")
    }
    | Command::Calendar => {
      renderer
        .write_calendar(
          &mut out,
          planner.calendar()
        )
        .context("failed writing calendar")
    }
    | Command::Assign { id, day } => {
      cmd_assign(planner, &mut out, &id, day)
    }
    | Command::Unassign { id, date } => {
      cmd_unassign(planner, &mut out, id, date)
    }
  }
}

fn cmd_add<S: StoragePort>(
  planner: &mut Planner<S>,
  out: &mut dyn Write,
  name: &str,
  now_ms: i64
) -> anyhow::Result<()> {
  match planner.add_task(name, now_ms)? {
    | Some(id) => {
      writeln!(out, "Added task {id}.")?
    }
    | None => {
      writeln!(
        out,
        "Nothing added: task name is empty."
      )?
    }
  }
  Ok(())
}

fn cmd_edit<S: StoragePort>(
  planner: &mut Planner<S>,
  out: &mut dyn Write,
  id: TaskId,
  name: &str
) -> anyhow::Result<()> {
  if planner.edit_task(id, name)? {
    writeln!(out, "Renamed task {id}.")?;
  } else if planner.tasks().contains(id) {
    writeln!(
      out,
      "Task {id} unchanged: name is empty."
    )?;
  } else {
    writeln!(out, "No task {id}.")?;
  }
  Ok(())
}

fn cmd_delete<S: StoragePort>(
  planner: &mut Planner<S>,
  out: &mut dyn Write,
  id: TaskId
) -> anyhow::Result<()> {
  if planner.delete_task(id)? {
    writeln!(out, "Deleted task {id}.")?;
  } else {
    writeln!(out, "No task {id}.")?;
  }
  Ok(())
}

fn cmd_assign<S: StoragePort>(
  planner: &mut Planner<S>,
  out: &mut dyn Write,
  raw_id: &str,
  day: u32
) -> anyhow::Result<()> {
  let month = planner.calendar().month();
  let date = month.date(day).ok_or_else(|| {
    anyhow!(
      "day {day} is not on the calendar \
       (1-{})",
      month.days()
    )
  })?;

  match planner.drop_on_day(raw_id, date)? {
    | DropOutcome::Added(event) => {
      writeln!(
        out,
        "Scheduled {:?} on {}.",
        event.title, event.date
      )?;
      Ok(())
    }
    | DropOutcome::Duplicate => {
      bail!(DUPLICATE_NOTICE)
    }
    | DropOutcome::UnknownTask(id) => {
      writeln!(
        out,
        "Nothing scheduled: no task {id}."
      )?;
      Ok(())
    }
    | DropOutcome::InvalidPayload(error) => {
      Err(
        anyhow::Error::new(error)
          .context("invalid task id")
      )
    }
  }
}

fn cmd_unassign<S: StoragePort>(
  planner: &mut Planner<S>,
  out: &mut dyn Write,
  id: TaskId,
  date: NaiveDate
) -> anyhow::Result<()> {
  if planner.remove_event(id, date)? {
    writeln!(
      out,
      "Removed task {id} from {date}."
    )?;
  } else {
    writeln!(
      out,
      "Task {id} is not scheduled on {date}."
    )?;
  }
  Ok(())
}
