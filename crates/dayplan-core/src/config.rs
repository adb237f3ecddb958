#[cfg(not(target_arch = "wasm32"))]
use std::fs;
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{
  Deserialize,
  Serialize
};
#[cfg(not(target_arch = "wasm32"))]
use tracing::{
  info,
  warn
};
use tracing::debug;

use crate::calendar::{
  CalendarMonth,
  DuplicatePolicy
};
use crate::error::ConfigError;

pub const CONFIG_ENV: &str =
  "DAYPLAN_CONFIG";

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub data_dir:    Option<PathBuf>,
  pub calendar:    CalendarConfig,
  #[serde(skip)]
  pub loaded_from: Option<PathBuf>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
  pub year:       i32,
  pub month:      u32,
  pub days:       u32,
  pub duplicates: DuplicatePolicy
}

impl Default for CalendarConfig {
  fn default() -> Self {
    let month = CalendarMonth::default();
    Self {
      year:       month.year(),
      month:      month.month(),
      days:       month.days(),
      duplicates: DuplicatePolicy::default()
    }
  }
}

impl Config {
  pub fn from_toml_str(
    text: &str
  ) -> Result<Self, ConfigError> {
    toml::from_str(text).map_err(|source| {
      ConfigError::Parse {
        origin: None,
        source
      }
    })
  }

  /// Keys accepted by [`Config::apply_overrides`].
  pub const OVERRIDE_KEYS: [&'static str; 5] = [
    "data_dir",
    "calendar.year",
    "calendar.month",
    "calendar.days",
    "calendar.duplicates"
  ];

  /// Applies `key=value` overrides on top of the loaded file.
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> Result<(), ConfigError>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      debug!(key = %key, value = %value, "applying override");
      let invalid = || {
        ConfigError::InvalidValue {
          key:   key.clone(),
          value: value.clone()
        }
      };
      let trimmed = value.trim();
      match key.trim() {
        | "data_dir" => {
          self.data_dir =
            Some(PathBuf::from(trimmed));
        }
        | "calendar.year" => {
          self.calendar.year = trimmed
            .parse()
            .map_err(|_| invalid())?;
        }
        | "calendar.month" => {
          self.calendar.month = trimmed
            .parse()
            .map_err(|_| invalid())?;
        }
        | "calendar.days" => {
          self.calendar.days = trimmed
            .parse()
            .map_err(|_| invalid())?;
        }
        | "calendar.duplicates" => {
          self.calendar.duplicates =
            trimmed
              .parse()
              .map_err(|_| invalid())?;
        }
        | other => {
          return Err(
            ConfigError::UnknownKey(
              other.to_string()
            )
          );
        }
      }
    }
    Ok(())
  }

  pub fn calendar_month(
    &self
  ) -> Result<CalendarMonth, ConfigError> {
    CalendarMonth::new(
      self.calendar.year,
      self.calendar.month,
      self.calendar.days
    )
  }

  pub fn duplicate_policy(
    &self
  ) -> DuplicatePolicy {
    self.calendar.duplicates
  }

  /// Loads the config file: `override_path`, else `$DAYPLAN_CONFIG`
  /// (`/dev/null` disables), else `<config dir>/dayplan/config.toml`.
  #[cfg(not(target_arch = "wasm32"))]
  #[tracing::instrument]
  pub fn load(
    override_path: Option<&Path>
  ) -> Result<Self, ConfigError> {
    let Some(path) =
      resolve_config_path(override_path)
    else {
      warn!("no config file found; using defaults");
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let text = fs::read_to_string(&path)
      .map_err(|source| {
        ConfigError::Io {
          path: path.clone(),
          source
        }
      })?;
    let mut cfg: Self = toml::from_str(
      &text
    )
    .map_err(|source| {
      ConfigError::Parse {
        origin: Some(path.clone()),
        source
      }
    })?;
    cfg.loaded_from = Some(path);
    Ok(cfg)
  }
}

#[cfg(not(target_arch = "wasm32"))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(expand_tilde(path));
  }

  if let Ok(raw) = std::env::var(CONFIG_ENV)
  {
    if raw == "/dev/null" {
      return None;
    }
    return Some(expand_tilde(Path::new(
      &raw
    )));
  }

  let candidate = dirs::config_dir()?
    .join("dayplan")
    .join("config.toml");
  candidate.exists().then_some(candidate)
}

/// Picks the storage directory: `override_dir`, else `data_dir` from the
/// config, else `<data dir>/dayplan`. The directory is created if missing.
#[cfg(not(target_arch = "wasm32"))]
#[tracing::instrument(skip(cfg))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> Result<PathBuf, ConfigError> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(path) =
    cfg.data_dir.as_deref()
  {
    expand_tilde(path)
  } else {
    dirs::data_dir()
      .ok_or(ConfigError::NoDataDir)?
      .join("dayplan")
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir).map_err(
      |source| ConfigError::Io {
        path: dir.clone(),
        source
      }
    )?;
  }

  Ok(dir)
}

#[cfg(not(target_arch = "wasm32"))]
fn expand_tilde(path: &Path) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::Config;
  use crate::calendar::DuplicatePolicy;
  use crate::error::ConfigError;

  #[test]
  fn empty_file_means_defaults() {
    let cfg = Config::from_toml_str("")
      .expect("parse empty config");
    assert_eq!(cfg, Config::default());
    let month = cfg
      .calendar_month()
      .expect("default month");
    assert_eq!(month.days(), 30);
    assert_eq!(
      cfg.duplicate_policy(),
      DuplicatePolicy::DayOfMonth
    );
  }

  #[test]
  fn reads_calendar_section() {
    let cfg = Config::from_toml_str(
      r#"
        data_dir = "/tmp/dayplan"

        [calendar]
        year = 2025
        month = 2
        days = 28
        duplicates = "exact-date"
      "#
    )
    .expect("parse config");

    let month = cfg
      .calendar_month()
      .expect("valid month");
    assert_eq!(month.title(), "February 2025");
    assert_eq!(
      cfg.duplicate_policy(),
      DuplicatePolicy::ExactDate
    );
  }

  #[test]
  fn rejects_unknown_keys() {
    assert!(matches!(
      Config::from_toml_str("colour = 1"),
      Err(ConfigError::Parse { .. })
    ));
  }

  #[test]
  fn overrides_apply_after_the_file() {
    let mut cfg = Config::default();
    cfg
      .apply_overrides([
        (
          "calendar.month".to_string(),
          "10".to_string()
        ),
        (
          "calendar.duplicates".to_string(),
          "exact-date".to_string()
        )
      ])
      .expect("apply overrides");
    assert_eq!(cfg.calendar.month, 10);
    assert_eq!(
      cfg.duplicate_policy(),
      DuplicatePolicy::ExactDate
    );

    assert!(matches!(
      cfg.apply_overrides([(
        "calendar.days".to_string(),
        "many".to_string()
      )]),
      Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
      cfg.apply_overrides([(
        "theme".to_string(),
        "night".to_string()
      )]),
      Err(ConfigError::UnknownKey(_))
    ));
  }

  #[test]
  fn out_of_range_month_is_refused() {
    let mut cfg = Config::default();
    cfg.calendar.days = 31;
    assert!(matches!(
      cfg.calendar_month(),
      Err(ConfigError::InvalidCalendar(_))
    ));
  }

  #[test]
  fn five_digit_year_is_refused() {
    let mut cfg = Config::default();
    cfg
      .apply_overrides([(
        "calendar.year".to_string(),
        "10000".to_string()
      )])
      .expect("year parses");
    assert!(matches!(
      cfg.calendar_month(),
      Err(ConfigError::InvalidCalendar(_))
    ));
  }
}
