use crate::task::{
  Task,
  TaskId,
  is_blank
};

/// Transient input state of the task list: the "add" draft and the one row
/// that may be in inline edit mode.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct TaskListState {
  draft:   String,
  editing: Option<RowEdit>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEdit {
  pub id:   TaskId,
  pub name: String
}

impl TaskListState {
  pub fn draft(&self) -> &str {
    &self.draft
  }

  pub fn set_draft(
    &mut self,
    value: impl Into<String>
  ) {
    self.draft = value.into();
  }

  /// Hands out the draft for submission and clears it. A blank draft is
  /// kept exactly as typed and nothing is returned.
  pub fn take_draft(
    &mut self
  ) -> Option<String> {
    if is_blank(&self.draft) {
      return None;
    }
    Some(std::mem::take(&mut self.draft))
  }

  pub fn editing(&self) -> Option<&RowEdit> {
    self.editing.as_ref()
  }

  pub fn is_editing(
    &self,
    id: TaskId
  ) -> bool {
    self
      .editing
      .as_ref()
      .is_some_and(|edit| edit.id == id)
  }

  /// Switches `task`'s row into edit mode, leaving any other row.
  pub fn begin_edit(
    &mut self,
    task: &Task
  ) {
    self.editing = Some(RowEdit {
      id:   task.id,
      name: task.name.clone()
    });
  }

  pub fn set_edit_name(
    &mut self,
    value: impl Into<String>
  ) {
    if let Some(edit) = self.editing.as_mut()
    {
      edit.name = value.into();
    }
  }

  /// Commits the edit: returns the rename and leaves edit mode, unless the
  /// new name is blank, in which case the row stays open.
  pub fn take_edit(
    &mut self
  ) -> Option<(TaskId, String)> {
    let edit = self.editing.as_ref()?;
    if is_blank(&edit.name) {
      return None;
    }
    self
      .editing
      .take()
      .map(|edit| (edit.id, edit.name))
  }

  pub fn cancel_edit(&mut self) {
    self.editing = None;
  }

  /// Drops edit mode when the row being edited disappears.
  pub fn forget(&mut self, id: TaskId) {
    if self.is_editing(id) {
      self.editing = None;
    }
  }
}
