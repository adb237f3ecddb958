//! The message a task row hands to a calendar day cell during a drag.
//!
//! The browser carries drag data as untyped strings keyed by format, so the
//! payload is written under [`DRAG_DATA_KEY`] as the decimal task id and
//! parsed back into a [`DragPayload`] before the calendar trusts it.

use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

use crate::error::PayloadError;
use crate::task::TaskId;

pub const DRAG_DATA_KEY: &str = "taskId";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
  pub dragged_task_id: TaskId
}

impl DragPayload {
  pub fn new(
    dragged_task_id: TaskId
  ) -> Self {
    Self { dragged_task_id }
  }

  pub fn encode(&self) -> String {
    self.dragged_task_id.to_string()
  }

  pub fn parse(
    raw: &str
  ) -> Result<Self, PayloadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(PayloadError::Empty);
    }

    let value =
      trimmed.parse::<i64>().map_err(
        |_| {
          PayloadError::NotAnInteger(
            trimmed.to_string()
          )
        }
      )?;

    TaskId::try_from(value).map(Self::new)
  }
}

impl FromStr for DragPayload {
  type Err = PayloadError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

#[cfg(test)]
mod tests {
  use super::DragPayload;
  use crate::error::PayloadError;
  use crate::task::TaskId;

  #[test]
  fn encode_then_parse_yields_the_same_task() {
    let id = TaskId::try_from(
      1_725_000_000_000
    )
    .expect("valid id");
    let payload = DragPayload::new(id);

    assert_eq!(
      payload.encode(),
      "1725000000000"
    );
    assert_eq!(
      DragPayload::parse(
        &payload.encode()
      ),
      Ok(payload)
    );
  }

  #[test]
  fn tolerates_surrounding_whitespace() {
    let parsed = DragPayload::parse(" 12\n")
      .expect("parse payload");
    assert_eq!(
      parsed.dragged_task_id.get(),
      12
    );
  }

  #[test]
  fn refuses_malformed_payloads() {
    assert_eq!(
      DragPayload::parse(""),
      Err(PayloadError::Empty)
    );
    assert_eq!(
      DragPayload::parse("12abc"),
      Err(PayloadError::NotAnInteger(
        "12abc".to_string()
      ))
    );
    assert_eq!(
      DragPayload::parse("1.5"),
      Err(PayloadError::NotAnInteger(
        "1.5".to_string()
      ))
    );
    assert_eq!(
      DragPayload::parse("-4"),
      Err(PayloadError::OutOfRange(-4))
    );
    assert!(matches!(
      DragPayload::parse(
        "99999999999999999999"
      ),
      Err(PayloadError::NotAnInteger(_))
    ));
  }

  #[test]
  fn serializes_as_a_typed_message() {
    let payload = DragPayload::new(
      TaskId::try_from(3)
        .expect("valid id")
    );
    assert_eq!(
      serde_json::to_string(&payload)
        .expect("encode"),
      r#"{"draggedTaskId":3}"#
    );
  }
}
