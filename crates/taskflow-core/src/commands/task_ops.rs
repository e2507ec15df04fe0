use std::io::Write;

use anyhow::anyhow;
use tracing::{
  info,
  instrument
};

use super::Flow;
use super::modifiers::parse_draft;
use crate::render::Renderer;
use crate::session::Session;
use crate::task::TaskId;

#[instrument(skip(
  session, renderer, args, out
))]
pub(super) fn cmd_add<W: Write>(
  session: &mut Session,
  renderer: &Renderer,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  info!("command add");

  let draft = parse_draft(args);
  match session.add_task(&draft) {
    | Ok(task) => {
      if renderer.json() {
        renderer.print_json(out, &task)?;
      } else {
        writeln!(
          out,
          "Created task {}.",
          task.id()
        )?;
      }
    }
    | Err(err) => {
      writeln!(
        out,
        "Task not created: {err}."
      )?;
    }
  }
  Ok(Flow::Continue)
}

/// Marks tasks completed. Tasks that are
/// already completed stay as they are.
#[instrument(skip(session, args, out))]
pub(super) fn cmd_done<W: Write>(
  session: &mut Session,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  info!("command done");

  for id in parse_ids(args)? {
    let completed = session
      .store()
      .get(id)
      .map(|task| task.is_completed());
    match completed {
      | None => {
        writeln!(out, "No task {id}.")?
      }
      | Some(true) => {
        writeln!(
          out,
          "Task {id} is already \
           completed."
        )?
      }
      | Some(false) => {
        session.toggle_complete(id);
        writeln!(
          out,
          "Completed task {id}."
        )?
      }
    }
  }
  Ok(Flow::Continue)
}

#[instrument(skip(session, args, out))]
pub(super) fn cmd_toggle<W: Write>(
  session: &mut Session,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  info!("command toggle");

  for id in parse_ids(args)? {
    match session.toggle_complete(id) {
      | Some(true) => {
        writeln!(
          out,
          "Completed task {id}."
        )?
      }
      | Some(false) => {
        writeln!(
          out,
          "Reopened task {id}."
        )?
      }
      | None => {
        writeln!(out, "No task {id}.")?
      }
    }
  }
  Ok(Flow::Continue)
}

#[instrument(skip(session, args, out))]
pub(super) fn cmd_delete<W: Write>(
  session: &mut Session,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  info!("command delete");

  for id in parse_ids(args)? {
    match session.delete_task(id) {
      | Some(task) => {
        writeln!(
          out,
          "Deleted task {id} '{}'.",
          task.title()
        )?
      }
      | None => {
        writeln!(out, "No task {id}.")?
      }
    }
  }
  Ok(Flow::Continue)
}

#[instrument(skip(
  session, renderer, args, out
))]
pub(super) fn cmd_info<W: Write>(
  session: &Session,
  renderer: &Renderer,
  args: &[String],
  out: &mut W
) -> anyhow::Result<Flow> {
  let today = session.today();
  for id in parse_ids(args)? {
    let Some(task) =
      session.store().get(id)
    else {
      writeln!(out, "No task {id}.")?;
      continue;
    };
    if renderer.json() {
      renderer.print_json(out, task)?;
    } else {
      renderer.print_task_info(
        out, task, today
      )?;
    }
  }
  Ok(Flow::Continue)
}

fn parse_ids(
  args: &[String]
) -> anyhow::Result<Vec<TaskId>> {
  if args.is_empty() {
    return Err(anyhow!(
      "expected at least one task id"
    ));
  }
  args
    .iter()
    .map(|raw| raw.parse::<TaskId>())
    .collect()
}
