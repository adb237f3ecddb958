use chrono::NaiveDate;
use dayplan_core::{
  Calendar,
  TaskId
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::CalendarDayCell;

#[derive(Properties, PartialEq)]
pub struct CalendarGridProps {
  pub calendar:      Calendar,
  pub on_drag_over:  Callback<NaiveDate>,
  pub on_drag_leave: Callback<()>,
  pub on_drop:
    Callback<(String, NaiveDate)>,
  pub on_remove:
    Callback<(TaskId, NaiveDate)>
}

#[function_component(CalendarGrid)]
pub fn calendar_grid(
  props: &CalendarGridProps
) -> Html {
  let month = props.calendar.month();
  let hovered = props.calendar.hovered();

  html! {
      <div class="panel calendar">
          <div class="header">
              <span>{ "Task Calendar" }</span>
              <span class="badge">{ month.title() }</span>
          </div>
          <div class="calendar-grid">
              {
                  for month.day_cells().map(|date| {
                      let events = props
                          .calendar
                          .events_on(date)
                          .cloned()
                          .collect::<Vec<_>>();
                      html! {
                          <CalendarDayCell
                              key={date.to_string()}
                              date={date}
                              events={events}
                              hovered={hovered == Some(date)}
                              on_drag_over={props.on_drag_over.clone()}
                              on_drag_leave={props.on_drag_leave.clone()}
                              on_drop={props.on_drop.clone()}
                              on_remove={props.on_remove.clone()}
                          />
                      }
                  })
              }
          </div>
      </div>
  }
}
