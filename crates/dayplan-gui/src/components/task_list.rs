use dayplan_core::{
  Task,
  TaskId,
  TaskListState
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:     Vec<Task>,
  pub on_add:    Callback<String>,
  pub on_edit:   Callback<(TaskId, String)>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  let state =
    use_state(TaskListState::default);

  let on_draft_input = {
    let state = state.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        let mut next = (*state).clone();
        next.set_draft(input.value());
        state.set(next);
      }
    )
  };

  let submit_draft = {
    let state = state.clone();
    let on_add = props.on_add.clone();
    Callback::from(move |()| {
      let mut next = (*state).clone();
      if let Some(name) = next.take_draft() {
        on_add.emit(name);
        state.set(next);
      }
    })
  };

  let on_add_click = {
    let submit_draft = submit_draft.clone();
    Callback::from(move |_| {
      submit_draft.emit(());
    })
  };

  let on_add_key = Callback::from(
    move |e: web_sys::KeyboardEvent| {
      if e.key() == "Enter" {
        submit_draft.emit(());
      }
    }
  );

  let on_begin_edit = {
    let state = state.clone();
    Callback::from(move |task: Task| {
      let mut next = (*state).clone();
      next.begin_edit(&task);
      state.set(next);
    })
  };

  let on_edit_input = {
    let state = state.clone();
    Callback::from(move |value: String| {
      let mut next = (*state).clone();
      next.set_edit_name(value);
      state.set(next);
    })
  };

  let on_save = {
    let state = state.clone();
    let on_edit = props.on_edit.clone();
    Callback::from(move |()| {
      let mut next = (*state).clone();
      if let Some(rename) = next.take_edit() {
        on_edit.emit(rename);
        state.set(next);
      }
    })
  };

  let on_delete = {
    let state = state.clone();
    let on_delete = props.on_delete.clone();
    Callback::from(move |id: TaskId| {
      if state.is_editing(id) {
        let mut next = (*state).clone();
        next.forget(id);
        state.set(next);
      }
      on_delete.emit(id);
    })
  };

  html! {
      <div class="panel task-manager">
          <div class="header">{ "Task Manager" }</div>
          <div class="task-add">
              <input
                  type="text"
                  placeholder="Add new task"
                  value={state.draft().to_string()}
                  oninput={on_draft_input}
                  onkeydown={on_add_key}
              />
              <button class="btn primary" onclick={on_add_click}>{ "Add Task" }</button>
          </div>
          <ul class="task-rows">
              {
                  for props.tasks.iter().cloned().map(|task| {
                      let editing = state
                          .editing()
                          .filter(|edit| edit.id == task.id)
                          .map(|edit| edit.name.clone());
                      html! {
                          <TaskListRow
                              key={task.id.to_string()}
                              task={task.clone()}
                              editing={editing}
                              on_begin_edit={on_begin_edit.clone()}
                              on_edit_input={on_edit_input.clone()}
                              on_save={on_save.clone()}
                              on_delete={on_delete.clone()}
                          />
                      }
                  })
              }
          </ul>
      </div>
  }
}
