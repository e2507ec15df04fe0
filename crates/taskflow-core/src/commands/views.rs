use std::io::Write;

use anyhow::anyhow;
use tracing::instrument;

use super::Flow;
use crate::config::Config;
use crate::render::Renderer;
use crate::session::Session;
use crate::view::{
  CategoryFilter,
  Dashboard
};

#[instrument(skip(session, args, out))]
pub(super) fn cmd_filter<W: Write>(
  session: &mut Session,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  match args {
    | [] => {}
    | [raw] => {
      let filter =
        raw.parse::<CategoryFilter>()?;
      session.set_filter(filter);
    }
    | _ => {
      return Err(anyhow!(
        "filter takes one argument: \
         all or a category id"
      ));
    }
  }
  writeln!(
    out,
    "Showing {}.",
    session.filter().heading()
  )?;
  Ok(Flow::Continue)
}

/// Active tasks for the selected
/// category. An argument narrows this
/// one listing without changing the
/// session filter.
#[instrument(skip(
  session, renderer, args, out
))]
pub(super) fn cmd_list<W: Write>(
  session: &Session,
  renderer: &Renderer,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  let filter = match args {
    | [] => session.filter(),
    | [raw] => {
      raw.parse::<CategoryFilter>()?
    }
    | _ => {
      return Err(anyhow!(
        "list takes at most one \
         argument: all or a category \
         id"
      ));
    }
  };

  let dashboard = Dashboard::build(
    session.tasks(),
    filter,
    session.today(),
    session.options()
  );
  if renderer.json() {
    renderer
      .print_json(out, &dashboard.active)?;
    return Ok(Flow::Continue);
  }

  writeln!(out, "{}", dashboard.heading)?;
  if dashboard.active.is_empty() {
    writeln!(
      out,
      "No active tasks found. Create \
       a new task to get started!"
    )?;
  } else {
    renderer.print_task_table(
      out,
      &dashboard.active,
      dashboard.today
    )?;
  }
  Ok(Flow::Continue)
}

#[instrument(skip(
  session, renderer, out
))]
pub(super) fn cmd_completed<W: Write>(
  session: &Session,
  renderer: &Renderer,
  out: &mut W
) -> anyhow::Result<Flow> {
  let dashboard = session.dashboard();
  if renderer.json() {
    renderer.print_json(
      out,
      &dashboard.completed
    )?;
    return Ok(Flow::Continue);
  }

  writeln!(out, "Completed")?;
  if dashboard.completed.is_empty() {
    writeln!(
      out,
      "No completed tasks yet. \
       Complete some tasks to see \
       them here!"
    )?;
  } else {
    renderer.print_task_table(
      out,
      &dashboard.completed,
      dashboard.today
    )?;
  }
  Ok(Flow::Continue)
}

#[instrument(skip(
  session, renderer, out
))]
pub(super) fn cmd_categories<W: Write>(
  session: &Session,
  renderer: &Renderer,
  out: &mut W
) -> anyhow::Result<Flow> {
  let dashboard = session.dashboard();
  if renderer.json() {
    renderer.print_json(
      out,
      &dashboard.categories
    )?;
    return Ok(Flow::Continue);
  }

  renderer.print_categories(
    out,
    &dashboard.categories,
    dashboard.summary.total,
    dashboard.filter
  )?;
  Ok(Flow::Continue)
}

#[instrument(skip(
  session, renderer, out
))]
pub(super) fn cmd_stats<W: Write>(
  session: &Session,
  renderer: &Renderer,
  out: &mut W
) -> anyhow::Result<Flow> {
  let dashboard = session.dashboard();
  if renderer.json() {
    renderer
      .print_json(out, &dashboard.summary)?;
  } else {
    renderer.print_summary(
      out,
      &dashboard.summary
    )?;
  }
  Ok(Flow::Continue)
}

#[instrument(skip(
  session, renderer, out
))]
pub(super) fn cmd_notify<W: Write>(
  session: &Session,
  renderer: &Renderer,
  out: &mut W
) -> anyhow::Result<Flow> {
  let dashboard = session.dashboard();
  if renderer.json() {
    renderer.print_json(
      out,
      &dashboard.notifications
    )?;
  } else {
    renderer.print_notifications(
      out,
      &dashboard.notifications
    )?;
  }
  Ok(Flow::Continue)
}

#[instrument(skip(
  session, renderer, out
))]
pub(super) fn cmd_dashboard<W: Write>(
  session: &Session,
  renderer: &Renderer,
  out: &mut W
) -> anyhow::Result<Flow> {
  let dashboard = session.dashboard();
  if renderer.json() {
    renderer.print_json(out, &dashboard)?;
    return Ok(Flow::Continue);
  }

  renderer.print_summary(
    out,
    &dashboard.summary
  )?;
  writeln!(out)?;
  if !dashboard.notifications.is_empty()
  {
    renderer.print_notifications(
      out,
      &dashboard.notifications
    )?;
    writeln!(out)?;
  }
  cmd_list(session, renderer, &[], out)
}

#[instrument(skip(
  session, renderer, out
))]
pub(super) fn cmd_export<W: Write>(
  session: &Session,
  renderer: &Renderer,
  out: &mut W
) -> anyhow::Result<Flow> {
  renderer.print_json(
    out,
    session.tasks()
  )?;
  Ok(Flow::Continue)
}

pub(super) fn cmd_config<W: Write>(
  cfg: &Config,
  out: &mut W
) -> anyhow::Result<Flow> {
  for path in &cfg.loaded_files {
    writeln!(
      out,
      "# loaded from {}",
      path.display()
    )?;
  }
  write!(out, "{}", cfg.to_toml_string()?)?;
  Ok(Flow::Continue)
}

pub(super) fn cmd_help<W: Write>(
  out: &mut W
) -> anyhow::Result<Flow> {
  writeln!(
    out,
    "Commands (unique prefixes work):\n  \
     add <title> cat:<category> \
     due:<date> [pri:<low|medium|high>] \
     [desc:\"...\"]\n  \
     done <id>...          mark \
     completed\n  \
     toggle <id>...        flip \
     completion\n  \
     delete <id>...        remove \
     tasks\n  \
     info <id>...          show one \
     task\n  \
     filter [all|<category>]\n  \
     list [all|<category>] active \
     tasks\n  \
     completed             completed \
     tasks (all categories)\n  \
     categories | stats | notify | \
     dashboard\n  \
     export | config | version | \
     help | quit\n\
     Categories: work, personal, \
     shopping, health, learning"
  )?;
  Ok(Flow::Continue)
}
