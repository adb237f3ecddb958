use chrono::NaiveDate;
use dayplan_core::{
  CalendarMonth,
  DragPayload,
  DropOutcome,
  DuplicatePolicy,
  EVENTS_KEY,
  FileStorage,
  MemoryStorage,
  Planner,
  StoragePort,
  TASKS_KEY
};
use tempfile::tempdir;

const NOW: i64 = 1_725_000_000_000;

fn september(day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 9, day)
    .expect("valid date")
}

fn planner_over<S: StoragePort>(
  storage: S
) -> Planner<S> {
  Planner::open(
    storage,
    CalendarMonth::default(),
    DuplicatePolicy::DayOfMonth
  )
}

#[test]
fn adding_persists_only_non_blank_tasks() {
  let mut planner =
    planner_over(MemoryStorage::new());

  let id = planner
    .add_task("Groceries", NOW)
    .expect("save tasks")
    .expect("task added");
  assert_eq!(
    planner
      .add_task("   ", NOW + 1)
      .expect("no save needed"),
    None
  );

  assert_eq!(planner.tasks().len(), 1);
  assert_eq!(
    planner.tasks().get(id).map(|t| t.name.as_str()),
    Some("Groceries")
  );
  assert_eq!(
    planner.storage().get(TASKS_KEY),
    Some(r#"[{"id":1725000000000,"name":"Groceries"}]"#)
  );
}

#[test]
fn edits_and_deletes_are_written_through() {
  let mut planner =
    planner_over(MemoryStorage::new());
  let a = planner
    .add_task("a", NOW)
    .expect("save")
    .expect("added");
  let b = planner
    .add_task("b", NOW + 5)
    .expect("save")
    .expect("added");

  assert!(planner.edit_task(a, "apple").expect("save"));
  assert!(planner.delete_task(b).expect("save"));
  assert!(!planner.delete_task(b).expect("noop"));

  let reopened =
    planner_over(planner.into_storage());
  let names = reopened
    .tasks()
    .tasks()
    .iter()
    .map(|task| (task.id, task.name.clone()))
    .collect::<Vec<_>>();
  assert_eq!(
    names,
    vec![(a, "apple".to_string())]
  );
}

#[test]
fn drop_then_duplicate_then_remove() {
  let mut planner =
    planner_over(MemoryStorage::new());
  let id = planner
    .add_task("Groceries", NOW)
    .expect("save")
    .expect("added");
  let transfer =
    DragPayload::new(id).encode();

  planner.drag_over(september(5));
  let first = planner
    .drop_on_day(&transfer, september(5))
    .expect("save events");
  assert!(first.changed());
  assert_eq!(planner.calendar().hovered(), None);

  let second = planner
    .drop_on_day(&transfer, september(5))
    .expect("nothing to save");
  assert_eq!(second, DropOutcome::Duplicate);
  assert_eq!(planner.calendar().events().len(), 1);

  let event = &planner.calendar().events()[0];
  assert_eq!(event.id, id);
  assert_eq!(event.title, "Groceries");
  assert_eq!(event.date, september(5));

  assert!(
    planner
      .remove_event(id, september(5))
      .expect("save events")
  );
  assert!(planner.calendar().events().is_empty());
  assert_eq!(
    planner.storage().get(EVENTS_KEY),
    Some("[]")
  );
}

#[test]
fn events_outlive_renames_and_deletes() {
  let mut planner =
    planner_over(MemoryStorage::new());
  let id = planner
    .add_task("Dentist", NOW)
    .expect("save")
    .expect("added");
  planner
    .assign(DragPayload::new(id), september(9))
    .expect("save events");

  planner.edit_task(id, "Orthodontist").expect("save");
  assert_eq!(
    planner.calendar().events()[0].title,
    "Dentist"
  );

  planner.delete_task(id).expect("save");
  assert_eq!(planner.calendar().events().len(), 1);
}

#[test]
fn dropping_a_deleted_task_is_ignored() {
  let mut planner =
    planner_over(MemoryStorage::new());
  let id = planner
    .add_task("Gone", NOW)
    .expect("save")
    .expect("added");
  planner.delete_task(id).expect("save");

  let outcome = planner
    .drop_on_day(&id.to_string(), september(1))
    .expect("nothing to save");
  assert_eq!(outcome, DropOutcome::UnknownTask(id));
  assert_eq!(planner.storage().get(EVENTS_KEY), None);
}

#[test]
fn malformed_storage_starts_empty() {
  let storage = MemoryStorage::new()
    .with_entry(TASKS_KEY, "{not json")
    .with_entry(EVENTS_KEY, r#"[{"id": "x"}]"#);
  let planner = planner_over(storage);
  assert!(planner.tasks().is_empty());
  assert!(planner.calendar().events().is_empty());
}

#[test]
fn file_storage_survives_reopen() {
  let temp = tempdir().expect("tempdir");
  let storage = FileStorage::open(temp.path())
    .expect("open storage");
  let mut planner = planner_over(storage);

  let id = planner
    .add_task("Water plants", NOW)
    .expect("save")
    .expect("added");
  planner
    .drop_on_day(&id.to_string(), september(14))
    .expect("save events");
  drop(planner);

  assert!(temp.path().join("tasks.json").exists());
  assert!(temp.path().join("events.json").exists());

  let reopened = planner_over(
    FileStorage::open(temp.path()).expect("reopen storage")
  );
  assert_eq!(reopened.tasks().len(), 1);
  assert_eq!(
    reopened.calendar().events()[0].date,
    september(14)
  );
}

#[test]
fn file_storage_reads_browser_shaped_events() {
  let temp = tempdir().expect("tempdir");
  std::fs::write(
    temp.path().join("events.json"),
    r#"[{"id":1725000000000,"title":"Run","date":"2024-09-05T00:00:00.000Z"}]"#
  )
  .expect("seed events");

  let planner = planner_over(
    FileStorage::open(temp.path()).expect("open storage")
  );
  let events = planner.calendar().events();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].date, september(5));
}

#[test]
fn file_storage_refuses_path_like_keys() {
  let temp = tempdir().expect("tempdir");
  let mut storage = FileStorage::open(temp.path())
    .expect("open storage");
  assert!(storage.save("../escape", "[]").is_err());
  assert!(storage.load("a/b").is_err());
}

#[test]
fn last_representable_year_survives_a_reopen() {
  assert!(CalendarMonth::new(10000, 9, 30).is_err());

  let month = CalendarMonth::new(9999, 12, 31)
    .expect("valid month");
  let date = month.date(31).expect("day 31");
  let mut planner = Planner::open(
    MemoryStorage::new(),
    month,
    DuplicatePolicy::DayOfMonth
  );
  let id = planner
    .add_task("Far future", NOW)
    .expect("save")
    .expect("added");
  planner
    .drop_on_day(&id.to_string(), date)
    .expect("save");

  let reopened = Planner::open(
    planner.into_storage(),
    month,
    DuplicatePolicy::DayOfMonth
  );
  assert_eq!(reopened.calendar().events().len(), 1);
  assert_eq!(reopened.calendar().events()[0].date, date);
}
