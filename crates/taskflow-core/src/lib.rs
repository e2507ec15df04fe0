pub mod category;
pub mod cli;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod draft;
pub mod notify;
pub mod render;
pub mod seed;
pub mod session;
pub mod store;
pub mod task;
pub mod view;

use std::ffi::OsString;
use std::io::{
  self,
  IsTerminal
};

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use category::Category;
pub use draft::{
  DraftError,
  TaskDraft
};
pub use store::{
  SharedTaskStore,
  TaskStore
};
pub use task::{
  Priority,
  Task,
  TaskId
};
pub use view::{
  CategoryFilter,
  Dashboard,
  Summary,
  ViewOptions
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting taskflow"
  );
  debug!(
    overrides = ?pre.rc_overrides,
    "preprocessed rc overrides"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg
    .apply_overrides(
      pre.rc_overrides.into_iter().chain(
        cli
          .rc_overrides
          .into_iter()
          .map(|kv| (kv.key, kv.value))
      )
    )
    .context(
      "failed to apply config \
       overrides"
    )?;
  if cli.seed {
    cfg.seed = true;
  }

  let mut session =
    session::Session::from_config(
      &cfg, cli.today
    )?;
  let renderer =
    render::Renderer::new(&cfg, cli.json);

  let stdout = io::stdout();
  let mut out = stdout.lock();

  if cli.rest.is_empty() {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    commands::run_session(
      &mut session,
      &cfg,
      &renderer,
      stdin.lock(),
      &mut out,
      prompt
    )?;
  } else {
    let tokens = cli
      .rest
      .into_iter()
      .map(|arg| {
        arg.to_string_lossy().to_string()
      })
      .collect();
    let inv =
      cli::Invocation::from_tokens(
        tokens
      )?;
    commands::dispatch(
      &mut session,
      &cfg,
      &renderer,
      inv,
      &mut out
    )?;
  }

  info!("done");
  Ok(())
}
