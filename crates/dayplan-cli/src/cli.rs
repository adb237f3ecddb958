use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{
  anyhow,
  bail
};
use clap::{
  ArgAction,
  Parser,
  Subcommand
};
use dayplan_core::{
  Config,
  DragPayload,
  PayloadError,
  TaskId
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// One `--set KEY=VALUE` config override. The key must name a setting
/// `Config::apply_overrides` understands, so typos fail at parse time.
#[derive(Debug, Clone)]
pub struct KeyVal {
  pub key:   String,
  pub value: String
}

impl std::str::FromStr for KeyVal {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let (key, value) =
      s.split_once('=').ok_or_else(|| {
        anyhow!(
          "expected KEY=VALUE, got: {s}"
        )
      })?;
    let key = key.trim();
    if !Config::OVERRIDE_KEYS.contains(&key) {
      bail!(
        "unknown setting {key:?} (one of: \
         {})",
        Config::OVERRIDE_KEYS.join(", ")
      );
    }
    Ok(Self {
      key:   key.to_string(),
      value: value.trim().to_string()
    })
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "dayplan",
  version,
  about = "Keep a task list and pin tasks to calendar days"
)]
pub struct Cli {
  #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
  pub verbose: u8,

  #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
  pub quiet: u8,

  /// Config file (defaults to $DAYPLAN_CONFIG, then the user config dir)
  #[arg(long = "config", global = true)]
  pub config: Option<PathBuf>,

  /// Directory holding tasks.json and events.json
  #[arg(long = "data", env = "DAYPLAN_DATA", global = true)]
  pub data: Option<PathBuf>,

  /// Override a config key, e.g. --set calendar.month=10
  #[arg(
    long = "set",
    value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
    action = ArgAction::Append,
    global = true
  )]
  pub overrides: Vec<KeyVal>,

  #[command(subcommand)]
  pub command: Option<Command>
}

#[derive(Subcommand, Debug, Clone, Default)]
pub enum Command {
  /// Add a task
  Add {
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    name: Vec<String>
  },
  /// Rename a task
  Edit {
    #[arg(value_parser = parse_task_id)]
    id:   TaskId,
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    name: Vec<String>
  },
  /// Delete a task (its calendar entries stay)
  Delete {
    #[arg(value_parser = parse_task_id)]
    id: TaskId
  },
  /// List tasks
  #[default]
  List,
  /// Show the calendar grid with scheduled tasks
  Calendar,
  /// Schedule a task on a day of the calendar month
  Assign {
    /// Task id, validated like a dragged task
    id:  String,
    day: u32
  },
  /// Remove a scheduled task from a date (YYYY-MM-DD)
  Unassign {
    #[arg(value_parser = parse_task_id)]
    id:   TaskId,
    date: chrono::NaiveDate
  }
}

fn parse_task_id(
  raw: &str
) -> Result<TaskId, PayloadError> {
  DragPayload::parse(raw)
    .map(|payload| payload.dragged_task_id)
}

/// Env var holding a tracing filter that replaces the flag-derived one.
pub const LOG_ENV: &str = "DAYPLAN_LOG";

/// Filter for `-v`/`-q`: dayplan's own crates log at the chosen level,
/// dependencies stay at `warn`.
pub fn default_filter(
  verbose: u8,
  quiet: u8
) -> String {
  let level = match (quiet, verbose) {
    | (2.., _) => "error",
    | (1, _) => "warn",
    | (0, 3..) => "trace",
    | (0, 2) => "debug",
    | (0, 1) => "info",
    | (0, 0) => "warn"
  };
  format!(
    "warn,dayplan={level},dayplan_core={level}"
  )
}

pub fn init_tracing(
  verbose: u8,
  quiet: u8
) -> anyhow::Result<()> {
  let env_filter =
    EnvFilter::try_from_env(LOG_ENV)
      .or_else(|_| {
        EnvFilter::try_new(default_filter(
          verbose, quiet
        ))
      })
      .map_err(|e| {
        anyhow!("invalid {LOG_ENV} filter: {e}")
      })?;

  let init_result =
    tracing_subscriber::fmt()
      .with_env_filter(env_filter)
      .with_target(verbose >= 2)
      .with_writer(std::io::stderr)
      .with_ansi(
        std::io::stderr().is_terminal()
      )
      .try_init();

  if let Err(err) = init_result {
    debug!(error = %err, "tracing subscriber already set, continuing");
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::{
    Cli,
    Command,
    KeyVal,
    default_filter
  };

  #[test]
  fn joins_multi_word_names() {
    let cli = Cli::try_parse_from([
      "dayplan", "add", "Buy", "milk"
    ])
    .expect("parse add");
    match cli.command {
      | Some(Command::Add { name }) => {
        assert_eq!(name.join(" "), "Buy milk")
      }
      | other => {
        panic!("unexpected {other:?}")
      }
    }
  }

  #[test]
  fn refuses_non_numeric_ids() {
    assert!(
      Cli::try_parse_from([
        "dayplan", "delete", "abc"
      ])
      .is_err()
    );
  }

  #[test]
  fn collects_overrides() {
    let cli = Cli::try_parse_from([
      "dayplan",
      "--set",
      "calendar.month=10",
      "calendar"
    ])
    .expect("parse overrides");
    assert_eq!(cli.overrides.len(), 1);
    assert_eq!(
      cli.overrides[0].key,
      "calendar.month"
    );
    assert!(matches!(
      cli.command,
      Some(Command::Calendar)
    ));
  }

  #[test]
  fn refuses_unknown_override_keys() {
    assert!(
      "calendar.weeks=5"
        .parse::<KeyVal>()
        .is_err()
    );
    assert!(
      "calendar.days".parse::<KeyVal>().is_err()
    );
    let kv = " calendar.days = 28 "
      .parse::<KeyVal>()
      .expect("known key");
    assert_eq!(kv.key, "calendar.days");
    assert_eq!(kv.value, "28");
  }

  #[test]
  fn verbosity_scopes_to_dayplan_crates() {
    assert_eq!(
      default_filter(0, 0),
      "warn,dayplan=warn,dayplan_core=warn"
    );
    assert_eq!(
      default_filter(2, 0),
      "warn,dayplan=debug,dayplan_core=debug"
    );
    assert_eq!(
      default_filter(3, 1),
      "warn,dayplan=warn,dayplan_core=warn"
    );
  }
}
