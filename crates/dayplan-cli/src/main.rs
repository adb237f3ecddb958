mod cli;
mod commands;
mod render;

use std::ffi::OsString;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dayplan_core::config::{
  Config,
  resolve_data_dir
};
use dayplan_core::{
  FileStorage,
  Planner
};
use tracing::{
  debug,
  info
};

fn main() {
  let args: Vec<OsString> =
    std::env::args_os().collect();
  if let Err(err) = run(args) {
    eprintln!("error: {err:#}");
    std::process::exit(1);
  }
}

#[tracing::instrument(skip_all)]
fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::Cli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting dayplan CLI"
  );

  let mut cfg =
    Config::load(cli.config.as_deref())
      .context("failed to load config")?;
  cfg
    .apply_overrides(
      cli
        .overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
    .context("invalid --set override")?;
  debug!(?cfg, "effective config");

  let month = cfg.calendar_month()?;
  let data_dir = resolve_data_dir(
    &cfg,
    cli.data.as_deref()
  )
  .context(
    "failed to resolve data directory"
  )?;

  let storage = FileStorage::open(
    &data_dir
  )
  .with_context(|| {
    format!(
      "failed to open storage at {}",
      data_dir.display()
    )
  })?;

  let mut planner = Planner::open(
    storage,
    month,
    cfg.duplicate_policy()
  );
  let mut renderer =
    render::Renderer::for_stdout();

  commands::dispatch(
    &mut planner,
    &mut renderer,
    cli.command.unwrap_or_default(),
    Utc::now().timestamp_millis()
  )?;

  info!("done");
  Ok(())
}
