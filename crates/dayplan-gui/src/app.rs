use chrono::NaiveDate;
use dayplan_core::{
  CalendarMonth,
  Config,
  DUPLICATE_NOTICE,
  DropOutcome,
  DuplicatePolicy,
  Planner,
  TaskId
};
use gloo::dialogs::alert;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_mut_ref,
  use_state
};

use crate::components::{
  CalendarGrid,
  TaskList
};
use crate::storage::BrowserStorage;

const BUNDLED_CONFIG: &str =
  include_str!("../dayplan.toml");

fn load_calendar_settings()
-> (CalendarMonth, DuplicatePolicy) {
  let parsed =
    Config::from_toml_str(BUNDLED_CONFIG)
      .and_then(|cfg| {
        Ok((
          cfg.calendar_month()?,
          cfg.duplicate_policy()
        ))
      });

  match parsed {
    | Ok(settings) => settings,
    | Err(error) => {
      tracing::error!(
        %error,
        "bundled calendar config is \
         invalid; using defaults"
      );
      (
        CalendarMonth::default(),
        DuplicatePolicy::default()
      )
    }
  }
}

fn open_planner() -> Planner<BrowserStorage>
{
  let (month, policy) =
    load_calendar_settings();
  Planner::open(
    BrowserStorage,
    month,
    policy
  )
}

fn now_millis() -> i64 {
  js_sys::Date::now() as i64
}

#[function_component(App)]
pub fn app() -> Html {
  let planner = use_mut_ref(open_planner);
  let refresh_tick =
    use_state(|| 0_u64);

  let refresh = {
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(move |()| {
      refresh_tick.set(
        (*refresh_tick).saturating_add(1)
      );
    })
  };

  let on_add = {
    let planner = planner.clone();
    let refresh = refresh.clone();
    Callback::from(move |name: String| {
      let result = planner
        .borrow_mut()
        .add_task(&name, now_millis());
      if let Err(error) = result {
        tracing::error!(%error, "failed saving tasks");
      }
      refresh.emit(());
    })
  };

  let on_edit = {
    let planner = planner.clone();
    let refresh = refresh.clone();
    Callback::from(
      move |(id, name): (TaskId, String)| {
        let result = planner
          .borrow_mut()
          .edit_task(id, &name);
        if let Err(error) = result {
          tracing::error!(%error, task_id = %id, "failed saving tasks");
        }
        refresh.emit(());
      }
    )
  };

  let on_delete = {
    let planner = planner.clone();
    let refresh = refresh.clone();
    Callback::from(move |id: TaskId| {
      let result =
        planner.borrow_mut().delete_task(id);
      if let Err(error) = result {
        tracing::error!(%error, task_id = %id, "failed saving tasks");
      }
      refresh.emit(());
    })
  };

  let on_drag_over = {
    let planner = planner.clone();
    let refresh = refresh.clone();
    Callback::from(move |date: NaiveDate| {
      let moved =
        planner.borrow_mut().drag_over(date);
      if moved {
        refresh.emit(());
      }
    })
  };

  let on_drag_leave = {
    let planner = planner.clone();
    let refresh = refresh.clone();
    Callback::from(move |()| {
      let cleared =
        planner.borrow_mut().drag_leave();
      if cleared {
        refresh.emit(());
      }
    })
  };

  let on_drop = {
    let planner = planner.clone();
    let refresh = refresh.clone();
    Callback::from(
      move |(transfer, date): (
        String,
        NaiveDate
      )| {
        let outcome = planner
          .borrow_mut()
          .drop_on_day(&transfer, date);
        refresh.emit(());
        match outcome {
          | Ok(DropOutcome::Duplicate) => {
            alert(DUPLICATE_NOTICE);
          }
          | Ok(_) => {}
          | Err(error) => {
            tracing::error!(%error, %date, "failed saving events");
          }
        }
      }
    )
  };

  let on_remove = {
    let planner = planner.clone();
    Callback::from(
      move |(id, date): (
        TaskId,
        NaiveDate
      )| {
        let result = planner
          .borrow_mut()
          .remove_event(id, date);
        if let Err(error) = result {
          tracing::error!(%error, task_id = %id, %date, "failed saving events");
        }
        refresh.emit(());
      }
    )
  };

  let (tasks, calendar) = {
    let planner = planner.borrow();
    (
      planner.tasks().tasks().to_vec(),
      planner.calendar().clone()
    )
  };

  html! {
      <div class="app">
          <TaskList
              tasks={tasks}
              on_add={on_add}
              on_edit={on_edit}
              on_delete={on_delete}
          />
          <CalendarGrid
              calendar={calendar}
              on_drag_over={on_drag_over}
              on_drag_leave={on_drag_leave}
              on_drop={on_drop}
              on_remove={on_remove}
          />
      </div>
  }
}
