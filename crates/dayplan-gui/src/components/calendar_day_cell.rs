use chrono::{
  Datelike,
  NaiveDate
};
use dayplan_core::{
  CalendarEvent,
  DRAG_DATA_KEY,
  TaskId
};
use web_sys::DragEvent;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CalendarDayCellProps {
  pub date:          NaiveDate,
  pub events:        Vec<CalendarEvent>,
  pub hovered:       bool,
  pub on_drag_over:  Callback<NaiveDate>,
  pub on_drag_leave: Callback<()>,
  /// Raw drag data and the cell it landed on.
  pub on_drop:
    Callback<(String, NaiveDate)>,
  pub on_remove:
    Callback<(TaskId, NaiveDate)>
}

#[function_component(CalendarDayCell)]
pub fn calendar_day_cell(
  props: &CalendarDayCellProps
) -> Html {
  let date = props.date;

  let ondragover = {
    let on_drag_over =
      props.on_drag_over.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        on_drag_over.emit(date);
      }
    )
  };

  let ondragleave = {
    let on_drag_leave =
      props.on_drag_leave.clone();
    Callback::from(move |_| {
      on_drag_leave.emit(());
    })
  };

  let ondrop = {
    let on_drop = props.on_drop.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        let transfer = match event
          .data_transfer()
          .map(|data| {
            data.get_data(DRAG_DATA_KEY)
          }) {
          | Some(Ok(raw)) => raw,
          | Some(Err(error)) => {
            tracing::warn!(
              ?error,
              "failed reading drag data"
            );
            String::new()
          }
          | None => String::new()
        };
        on_drop.emit((transfer, date));
      }
    )
  };

  let show_placeholder =
    props.hovered && props.events.is_empty();

  html! {
      <div class={classes!("calendar-day", props.hovered.then_some("drop-hint"))} {ondragover} {ondragleave} {ondrop}>
          <div class="calendar-day-title">{ format!("Day {}", date.day()) }</div>
          {
              for props.events.iter().map(|event| {
                  let on_remove = props.on_remove.clone();
                  let event_id = event.id;
                  let event_date = event.date;
                  html! {
                      <div class="calendar-event" key={format!("{}-{}", event.id, event.date)}>
                          <span class="calendar-event-title">{ &event.title }</span>
                          <button
                              class="btn danger small"
                              title="Remove"
                              onclick={Callback::from(move |_| on_remove.emit((event_id, event_date)))}
                          >
                              { "✕" }
                          </button>
                      </div>
                  }
              })
          }
          {
              if show_placeholder {
                  html! { <div class="calendar-drop-placeholder">{ "Drop task here" }</div> }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
