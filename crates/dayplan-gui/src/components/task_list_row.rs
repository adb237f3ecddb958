use dayplan_core::{
  DRAG_DATA_KEY,
  DragPayload,
  Task,
  TaskId
};
use web_sys::DragEvent;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub task:          Task,
  /// The inline field's text while this row is in edit mode.
  pub editing:       Option<String>,
  pub on_begin_edit: Callback<Task>,
  pub on_edit_input: Callback<String>,
  pub on_save:       Callback<()>,
  pub on_delete:     Callback<TaskId>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let task_id = props.task.id;

  if let Some(draft) = &props.editing {
    let on_edit_input =
      props.on_edit_input.clone();
    let on_save_click = {
      let on_save = props.on_save.clone();
      Callback::from(move |_| {
        on_save.emit(());
      })
    };
    let on_save_key = {
      let on_save = props.on_save.clone();
      Callback::from(
        move |e: web_sys::KeyboardEvent| {
          if e.key() == "Enter" {
            on_save.emit(());
          }
        }
      )
    };

    return html! {
        <li class="task-row editing">
            <input
                class="task-edit-input"
                type="text"
                value={draft.clone()}
                onkeydown={on_save_key}
                oninput={Callback::from(move |e: web_sys::InputEvent| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    on_edit_input.emit(input.value());
                })}
            />
            <button class="btn success small" onclick={on_save_click}>{ "Save" }</button>
        </li>
    };
  }

  let ondragstart = Callback::from(
    move |event: DragEvent| {
      if let Some(data_transfer) =
        event.data_transfer()
      {
        let payload =
          DragPayload::new(task_id);
        if let Err(error) = data_transfer
          .set_data(
            DRAG_DATA_KEY,
            &payload.encode()
          )
        {
          tracing::warn!(
            ?error,
            task_id = %task_id,
            "failed writing drag data"
          );
        }
        data_transfer
          .set_effect_allowed("copy");
      }
    }
  );

  let on_edit_click = {
    let on_begin_edit =
      props.on_begin_edit.clone();
    let task = props.task.clone();
    Callback::from(move |_| {
      on_begin_edit.emit(task.clone());
    })
  };

  let on_delete_click = {
    let on_delete =
      props.on_delete.clone();
    Callback::from(move |_| {
      on_delete.emit(task_id);
    })
  };

  html! {
      <li class="task-row">
          <div class="draggable-task" draggable="true" {ondragstart}>
              { &props.task.name }
          </div>
          <div class="task-actions">
              <button class="btn outline small" onclick={on_edit_click}>{ "Edit" }</button>
              <button class="btn danger small" onclick={on_delete_click}>{ "Delete" }</button>
          </div>
      </li>
  }
}
