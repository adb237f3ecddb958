use std::ops::RangeInclusive;

#[cfg(target_arch = "wasm32")]
use chrono::Local;
use chrono::{
  DateTime,
  Datelike,
  NaiveDate,
  TimeDelta,
  TimeZone,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

use crate::task::{
  Task,
  TaskId
};

/// A task pinned to a calendar date.
///
/// `title` is copied from the task when the event is created and is never
/// refreshed: events record what was scheduled, so renaming or deleting the
/// task leaves them untouched.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct CalendarEvent {
  pub id:    TaskId,
  pub title: String,
  #[serde(with = "event_date_serde")]
  pub date:  NaiveDate
}

impl CalendarEvent {
  pub fn snapshot(
    task: &Task,
    date: NaiveDate
  ) -> Self {
    Self {
      id: task.id,
      title: task.name.clone(),
      date
    }
  }

  pub fn day(&self) -> u32 {
    self.date.day()
  }
}

/// Years an event date may carry. Wider years do not survive the
/// four-digit timestamp encoding.
pub const EVENT_YEARS: RangeInclusive<i32> =
  1..=9999;

/// Zone in which stored instants are read back as calendar days.
///
/// The browser build stores dates as local midnight, so instants are
/// converted through the browser's zone. Native builds use UTC.
#[cfg(target_arch = "wasm32")]
pub fn storage_zone() -> Local {
  Local
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_zone() -> Utc {
  Utc
}

/// Reads a persisted event date in [`storage_zone`].
pub fn parse_event_date(
  raw: &str
) -> Option<NaiveDate> {
  parse_event_date_in(raw, &storage_zone())
}

/// Reads a persisted event date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp or epoch milliseconds
/// written as a string. Instants become the calendar day they fall on in
/// `zone`.
pub fn parse_event_date_in<Tz: TimeZone>(
  raw: &str,
  zone: &Tz
) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      raw, "%Y-%m-%d"
    )
  {
    return in_event_years(date);
  }

  if let Ok(stamp) =
    DateTime::parse_from_rfc3339(raw)
  {
    return in_event_years(
      stamp.with_timezone(zone).date_naive()
    );
  }

  raw
    .parse::<i64>()
    .ok()
    .and_then(|millis| {
      date_from_epoch_millis_in(millis, zone)
    })
}

pub fn date_from_epoch_millis(
  millis: i64
) -> Option<NaiveDate> {
  date_from_epoch_millis_in(
    millis,
    &storage_zone()
  )
}

pub fn date_from_epoch_millis_in<
  Tz: TimeZone
>(
  millis: i64,
  zone: &Tz
) -> Option<NaiveDate> {
  DateTime::<Utc>::from_timestamp_millis(
    millis
  )
  .map(|stamp| {
    stamp.with_timezone(zone).date_naive()
  })
  .and_then(in_event_years)
}

fn in_event_years(
  date: NaiveDate
) -> Option<NaiveDate> {
  EVENT_YEARS
    .contains(&date.year())
    .then_some(date)
}

/// Writes `date` as the UTC instant of its midnight in [`storage_zone`].
pub fn format_event_date(
  date: NaiveDate
) -> String {
  format_event_date_in(date, &storage_zone())
}

pub fn format_event_date_in<Tz: TimeZone>(
  date: NaiveDate,
  zone: &Tz
) -> String {
  // A midnight skipped by a DST jump moves to 01:00 local.
  let midnight = date
    .and_hms_opt(0, 0, 0)
    .and_then(|naive| {
      zone
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
          zone
            .from_local_datetime(
              &(naive + TimeDelta::hours(1))
            )
            .earliest()
        })
    });

  match midnight {
    | Some(stamp) => stamp
      .with_timezone(&Utc)
      .format("%Y-%m-%dT%H:%M:%S%.3fZ")
      .to_string(),
    | None => date
      .format("%Y-%m-%dT00:00:00.000Z")
      .to_string()
  }
}

pub mod event_date_serde {
  use std::fmt;

  use chrono::NaiveDate;
  use serde::de::{
    self,
    Visitor
  };
  use serde::{
    Deserializer,
    Serializer
  };

  use super::{
    date_from_epoch_millis,
    format_event_date,
    parse_event_date
  };

  pub fn serialize<S>(
    date: &NaiveDate,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer.serialize_str(
      &format_event_date(*date)
    )
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<NaiveDate, D::Error>
  where
    D: Deserializer<'de>
  {
    deserializer
      .deserialize_any(EventDateVisitor)
  }

  struct EventDateVisitor;

  impl Visitor<'_> for EventDateVisitor {
    type Value = NaiveDate;

    fn expecting(
      &self,
      f: &mut fmt::Formatter<'_>
    ) -> fmt::Result {
      f.write_str(
        "an ISO-8601 date, an RFC 3339 \
         timestamp or epoch milliseconds"
      )
    }

    fn visit_str<E>(
      self,
      raw: &str
    ) -> Result<NaiveDate, E>
    where
      E: de::Error
    {
      parse_event_date(raw).ok_or_else(
        || {
          E::custom(format!(
            "unrecognized event date: \
             {raw:?}"
          ))
        }
      )
    }

    fn visit_i64<E>(
      self,
      millis: i64
    ) -> Result<NaiveDate, E>
    where
      E: de::Error
    {
      date_from_epoch_millis(millis)
        .ok_or_else(|| {
          E::custom(format!(
            "epoch millis out of range: \
             {millis}"
          ))
        })
    }

    fn visit_u64<E>(
      self,
      millis: u64
    ) -> Result<NaiveDate, E>
    where
      E: de::Error
    {
      let millis = i64::try_from(millis)
        .map_err(E::custom)?;
      self.visit_i64(millis)
    }

    fn visit_f64<E>(
      self,
      millis: f64
    ) -> Result<NaiveDate, E>
    where
      E: de::Error
    {
      if !millis.is_finite() {
        return Err(E::custom(
          "epoch millis must be finite"
        ));
      }
      self.visit_i64(millis.trunc() as i64)
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    FixedOffset,
    NaiveDate,
    Utc
  };

  use super::{
    CalendarEvent,
    date_from_epoch_millis,
    date_from_epoch_millis_in,
    format_event_date_in,
    parse_event_date,
    parse_event_date_in
  };
  use crate::task::{
    Task,
    TaskId
  };

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn utc_plus_two() -> FixedOffset {
    FixedOffset::east_opt(2 * 3600)
      .expect("valid offset")
  }

  fn utc_minus_five() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600)
      .expect("valid offset")
  }

  #[test]
  fn parses_every_persisted_date_shape() {
    assert_eq!(
      parse_event_date("2024-09-05"),
      Some(ymd(2024, 9, 5))
    );
    assert_eq!(
      parse_event_date(
        "2024-09-05T00:00:00.000Z"
      ),
      Some(ymd(2024, 9, 5))
    );
    assert_eq!(
      parse_event_date("1725494400000"),
      Some(ymd(2024, 9, 5))
    );
    assert_eq!(
      parse_event_date("next tuesday"),
      None
    );
  }

  #[test]
  fn instants_land_on_the_local_day() {
    // Local midnight of Sept 5 in a UTC+2 browser.
    let stored = "2024-09-04T22:00:00.000Z";
    assert_eq!(
      parse_event_date_in(
        stored,
        &utc_plus_two()
      ),
      Some(ymd(2024, 9, 5))
    );
    assert_eq!(
      parse_event_date_in(stored, &Utc),
      Some(ymd(2024, 9, 4))
    );
    assert_eq!(
      parse_event_date_in(
        "2024-09-05T00:00:00+02:00",
        &Utc
      ),
      Some(ymd(2024, 9, 4))
    );
    assert_eq!(
      date_from_epoch_millis_in(
        1_725_487_200_000,
        &utc_plus_two()
      ),
      Some(ymd(2024, 9, 5))
    );
  }

  #[test]
  fn local_midnight_reads_back_as_the_same_day() {
    for zone in [utc_plus_two(), utc_minus_five()] {
      for day in [1, 5, 30] {
        let date = ymd(2024, 9, day);
        let stored =
          format_event_date_in(date, &zone);
        assert_eq!(
          parse_event_date_in(&stored, &zone),
          Some(date),
          "{stored} in {zone}"
        );
      }
    }
    assert_eq!(
      format_event_date_in(
        ymd(2024, 9, 5),
        &utc_plus_two()
      ),
      "2024-09-04T22:00:00.000Z"
    );
  }

  #[test]
  fn rejects_dates_outside_four_digit_years() {
    assert_eq!(
      parse_event_date(
        "+10000-09-05T00:00:00.000Z"
      ),
      None
    );
    assert_eq!(
      parse_event_date("0000-09-05"),
      None
    );
    assert_eq!(
      date_from_epoch_millis(
        300_000_000_000_000
      ),
      None
    );
  }

  #[test]
  fn decodes_numeric_and_string_dates() {
    let raw = r#"[
      {"id": 1725000000000, "title": "a", "date": "2024-09-04T22:00:00.000Z"},
      {"id": 1725000000001, "title": "b", "date": 1725494400000}
    ]"#;
    let events: Vec<CalendarEvent> =
      serde_json::from_str(raw)
        .expect("decode events");
    assert_eq!(
      events[0].date,
      ymd(2024, 9, 4)
    );
    assert_eq!(events[1].day(), 5);
  }

  #[test]
  fn snapshot_copies_the_current_name() {
    let mut task = Task {
      id:   TaskId::try_from(42)
        .expect("valid id"),
      name: "Groceries".to_string()
    };
    let event = CalendarEvent::snapshot(
      &task,
      ymd(2024, 9, 5)
    );
    task.name = "Renamed".to_string();

    assert_eq!(event.title, "Groceries");
    assert_eq!(event.id, task.id);
  }

  #[test]
  fn encodes_dates_as_utc_midnight() {
    let event = CalendarEvent {
      id:    TaskId::try_from(7)
        .expect("valid id"),
      title: "x".to_string(),
      date:  ymd(2024, 9, 30)
    };
    let json = serde_json::to_string(&event)
      .expect("encode event");
    assert_eq!(
      json,
      r#"{"id":7,"title":"x","date":"2024-09-30T00:00:00.000Z"}"#
    );
  }
}
