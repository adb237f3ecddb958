use std::io::{
  self,
  IsTerminal,
  Write
};

use chrono::Datelike;
use dayplan_core::{
  Calendar,
  Task
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct Renderer {
  color: bool
}

impl Renderer {
  pub fn new(color: bool) -> Self {
    Self { color }
  }

  pub fn for_stdout() -> Self {
    let color = io::stdout().is_terminal()
      && std::env::var_os("NO_COLOR")
        .is_none();
    Self::new(color)
  }

  #[tracing::instrument(skip_all, fields(count = tasks.len()))]
  pub fn write_task_table(
    &self,
    out: &mut dyn Write,
    tasks: &[Task]
  ) -> io::Result<()> {
    if tasks.is_empty() {
      return writeln!(out, "No tasks.");
    }

    let headers =
      vec!["ID".to_string(), "Name".to_string()];
    let rows = tasks
      .iter()
      .map(|task| {
        vec![
          self.paint(&task.id.to_string(), "33"),
          task.name.clone(),
        ]
      })
      .collect::<Vec<_>>();

    write_table(out, headers, rows)
  }

  /// One line per day cell, scheduled titles after the day label.
  #[tracing::instrument(skip_all)]
  pub fn write_calendar(
    &self,
    out: &mut dyn Write,
    calendar: &Calendar
  ) -> io::Result<()> {
    let month = calendar.month();
    writeln!(
      out,
      "{}",
      self.paint(&month.title(), "1")
    )?;

    for date in month.day_cells() {
      let label =
        format!("Day {:>2}", date.day());
      let titles = calendar
        .events_on(date)
        .map(|event| {
          format!(
            "{} ({})",
            event.title,
            self.paint(&event.id.to_string(), "33")
          )
        })
        .collect::<Vec<_>>();

      if titles.is_empty() {
        writeln!(out, "{label}")?;
      } else {
        writeln!(
          out,
          "{label}  {}",
          titles.join(", ")
        )?;
      }
    }
    Ok(())
  }

  fn paint(
    &self,
    text: &str,
    code: &str
  ) -> String {
    if self.color {
      format!("\x1b[{code}m{text}\x1b[0m")
    } else {
      text.to_string()
    }
  }
}

fn write_table(
  out: &mut dyn Write,
  headers: Vec<String>,
  rows: Vec<Vec<String>>
) -> io::Result<()> {
  let mut widths = headers
    .iter()
    .map(|h| visible_width(h))
    .collect::<Vec<_>>();

  for row in &rows {
    for (idx, cell) in row.iter().enumerate() {
      if let Some(width) = widths.get_mut(idx) {
        *width =
          (*width).max(visible_width(cell));
      }
    }
  }

  write_row(out, &headers, &widths)?;
  let rule = widths
    .iter()
    .map(|width| "-".repeat(*width))
    .collect::<Vec<_>>();
  write_row(out, &rule, &widths)?;
  for row in &rows {
    write_row(out, row, &widths)?;
  }
  Ok(())
}

fn write_row(
  out: &mut dyn Write,
  cells: &[String],
  widths: &[usize]
) -> io::Result<()> {
  let mut line = String::new();
  for (idx, cell) in cells.iter().enumerate() {
    let width =
      widths.get(idx).copied().unwrap_or(0);
    line.push_str(cell);
    if idx + 1 < cells.len() {
      let pad =
        width.saturating_sub(visible_width(cell));
      line.push_str(&" ".repeat(pad + 2));
    }
  }
  writeln!(out, "{}", line.trim_end())
}

fn visible_width(text: &str) -> usize {
  let mut plain = String::with_capacity(text.len());
  let mut chars = text.chars();
  while let Some(c) = chars.next() {
    if c == '\x1b' {
      for inner in chars.by_ref() {
        if inner == 'm' {
          break;
        }
      }
    } else {
      plain.push(c);
    }
  }
  UnicodeWidthStr::width(plain.as_str())
}
