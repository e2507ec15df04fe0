use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskflow",
    version,
    about = "TaskFlow: in-memory task tracker with deadline notifications",
    disable_help_subcommand = true,
    arg_required_else_help = false
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Pin "today" (YYYY-MM-DD) instead of reading the clock.
    #[arg(long = "today")]
    pub today: Option<NaiveDate>,

    /// Start the session with the sample tasks.
    #[arg(long = "seed")]
    pub seed: bool,

    /// Print views as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<OsString>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Global flags whose value arrives as the following argument.
const VALUE_FLAGS: [&str; 3] = ["--config", "--rc", "--today"];

/// Pulls `rc.key=value` / `rc.key:value` tokens out of the raw arguments so
/// they can be applied as config overrides. Only tokens ahead of the command
/// are considered; from the first command word on, arguments pass through
/// untouched so task text like `rc.cola:buy` survives.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    let mut expect_value = false;
    while let Some(arg) = iter.next() {
        let s = arg.to_string_lossy().into_owned();

        if expect_value {
            expect_value = false;
            cleaned.push(arg);
            continue;
        }

        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else if let Some((k, v)) = rest.split_once(':') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                None
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        if s == "--" || !s.starts_with('-') {
            debug!(token = %s, "command reached, remaining arguments kept verbatim");
            cleaned.push(arg);
            cleaned.extend(iter.by_ref());
            break;
        }

        expect_value = VALUE_FLAGS.contains(&s.as_str());
        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

/// One session command: the resolved command name and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    #[tracing::instrument]
    pub fn parse_line(line: &str) -> anyhow::Result<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let tokens = split_line(trimmed)?;
        Self::from_tokens(tokens).map(Some)
    }

    #[tracing::instrument(skip(tokens))]
    pub fn from_tokens(tokens: Vec<String>) -> anyhow::Result<Self> {
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(Self {
                command: "dashboard".to_string(),
                args: vec![],
            });
        };

        if rest.is_empty() && first.parse::<u64>().is_ok() {
            debug!(token = %first, "single numeric token interpreted as task info query");
            return Ok(Self {
                command: "info".to_string(),
                args: vec![first.clone()],
            });
        }

        let known = crate::commands::known_command_names();
        let Some(command) = crate::commands::expand_command_abbrev(first, &known) else {
            warn!(token = %first, "unrecognized command token");
            return Err(anyhow!("unknown command: {first} (try 'help')"));
        };
        debug!(token = %first, expanded = %command, "resolved command token");

        Ok(Self {
            command: command.to_string(),
            args: rest.to_vec(),
        })
    }
}

/// Splits a line on whitespace, keeping quoted runs together. Quotes may
/// start mid-token, so `desc:"two words"` becomes `desc:two words`.
pub fn split_line(line: &str) -> anyhow::Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(anyhow!("unterminated {q} quote in: {line}"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
