use tracing::{
  instrument,
  trace
};

use crate::draft::TaskDraft;

#[derive(Debug, Clone)]
enum Mod {
  Category(String),
  Priority(String),
  Due(String),
  Description(String)
}

/// Builds a draft from `add` arguments:
/// bare words form the title, and
/// `key:value` (or `key=value`) tokens
/// fill the other fields. Everything
/// after `--` is title text.
///
/// Nothing is validated here; the store
/// decides whether the draft is
/// complete.
#[instrument(skip(args))]
pub fn parse_draft(
  args: &[String]
) -> TaskDraft {
  let mut title_parts = Vec::new();
  let mut draft = TaskDraft::default();

  let mut literal = false;
  for arg in args {
    if !literal && arg == "--" {
      literal = true;
      continue;
    }

    if !literal
      && let Some(one_mod) =
        parse_one_mod(arg)
    {
      trace!(?one_mod, "parsed modifier");
      match one_mod {
        | Mod::Category(value) => {
          draft.category = Some(value);
        }
        | Mod::Priority(value) => {
          draft.priority = Some(value);
        }
        | Mod::Due(value) => {
          draft.due = Some(value);
        }
        | Mod::Description(value) => {
          draft.description =
            Some(value);
        }
      }
      continue;
    }

    title_parts.push(arg.as_str());
  }

  if !title_parts.is_empty() {
    draft.title =
      Some(title_parts.join(" "));
  }
  draft
}

fn parse_one_mod(
  tok: &str
) -> Option<Mod> {
  let (key, value) =
    if let Some((k, v)) =
      tok.split_once(':')
    {
      (k, v)
    } else if let Some((k, v)) =
      tok.split_once('=')
    {
      (k, v)
    } else {
      return None;
    };

  let value = value.to_string();
  match key
    .to_ascii_lowercase()
    .as_str()
  {
    | "cat" | "category" => {
      Some(Mod::Category(value))
    }
    | "pri" | "priority" => {
      Some(Mod::Priority(value))
    }
    | "due" => Some(Mod::Due(value)),
    | "desc" | "description" => {
      Some(Mod::Description(value))
    }
    | _ => None
  }
}
