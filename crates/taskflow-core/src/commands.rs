mod modifiers;
mod task_ops;
mod views;

use std::io::{BufRead, Write};

use anyhow::anyhow;
use tracing::{debug, instrument, warn};

use crate::cli::Invocation;
use crate::config::Config;
use crate::render::Renderer;
use crate::session::Session;

pub use modifiers::parse_draft;

/// Whether the session keeps reading input after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add",
        "done",
        "toggle",
        "delete",
        "filter",
        "list",
        "completed",
        "categories",
        "stats",
        "notify",
        "dashboard",
        "info",
        "export",
        "config",
        "help",
        "version",
        "quit",
        "exit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &str, known: &[&'a str]) -> Option<&'a str> {
    let token = token.to_ascii_lowercase();
    if let Some(exact) = known.iter().copied().find(|name| *name == token) {
        return Some(exact);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(&token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(session, cfg, renderer, inv, out), fields(command = %inv.command))]
pub fn dispatch<W: Write>(
    session: &mut Session,
    cfg: &Config,
    renderer: &Renderer,
    inv: Invocation,
    out: &mut W,
) -> anyhow::Result<Flow> {
    debug!(args = ?inv.args, "dispatching command");

    match inv.command.as_str() {
        "add" => task_ops::cmd_add(session, renderer, &inv.args, out),
        "done" => task_ops::cmd_done(session, &inv.args, out),
        "toggle" => task_ops::cmd_toggle(session, &inv.args, out),
        "delete" => task_ops::cmd_delete(session, &inv.args, out),
        "info" => task_ops::cmd_info(session, renderer, &inv.args, out),
        "filter" => views::cmd_filter(session, &inv.args, out),
        "list" => views::cmd_list(session, renderer, &inv.args, out),
        "completed" => views::cmd_completed(session, renderer, out),
        "categories" => views::cmd_categories(session, renderer, out),
        "stats" => views::cmd_stats(session, renderer, out),
        "notify" => views::cmd_notify(session, renderer, out),
        "dashboard" => views::cmd_dashboard(session, renderer, out),
        "export" => views::cmd_export(session, renderer, out),
        "config" => views::cmd_config(cfg, out),
        "help" => views::cmd_help(out),
        "version" => {
            writeln!(out, "{}", env!("CARGO_PKG_VERSION"))?;
            Ok(Flow::Continue)
        }
        "quit" | "exit" => Ok(Flow::Quit),
        other => Err(anyhow!("unknown command: {other}")),
    }
}

/// Reads commands line by line until EOF or `quit`. A failing line is
/// reported and the session carries on.
#[instrument(skip_all)]
pub fn run_session<R: BufRead, W: Write>(
    session: &mut Session,
    cfg: &Config,
    renderer: &Renderer,
    input: R,
    out: &mut W,
    prompt: bool,
) -> anyhow::Result<()> {
    if prompt {
        write!(out, "taskflow> ")?;
        out.flush()?;
    }

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let result = Invocation::parse_line(&line).and_then(|inv| match inv {
            Some(inv) => dispatch(session, cfg, renderer, inv, out),
            None => Ok(Flow::Continue),
        });

        match result {
            Ok(Flow::Quit) => {
                debug!(line = idx + 1, "quit requested");
                return Ok(());
            }
            Ok(Flow::Continue) => {}
            Err(err) => {
                warn!(line = idx + 1, error = %err, "command failed");
                writeln!(out, "error: {err:#}")?;
            }
        }

        if prompt {
            write!(out, "taskflow> ")?;
            out.flush()?;
        }
    }

    Ok(())
}
