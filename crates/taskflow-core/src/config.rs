use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::view::{
  CategoryFilter,
  DEFAULT_PREVIEW_LIMIT,
  DEFAULT_UPCOMING_DAYS,
  ViewOptions
};

const CONFIG_ENV_VAR: &str =
  "TASKFLOW_CONFIG";
const CONFIG_DIR_NAME: &str =
  "taskflow";
const CONFIG_FILE_NAME: &str =
  "config.toml";

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Config {
  pub timezone:         Option<String>,
  pub color:            bool,
  pub seed:             bool,
  pub default_category: String,
  pub upcoming_days:    u32,
  pub preview_limit:    usize,
  #[serde(skip)]
  pub loaded_files:     Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      timezone:         None,
      color:            true,
      seed:             false,
      default_category: "all"
        .to_string(),
      upcoming_days:
        DEFAULT_UPCOMING_DAYS,
      preview_limit:
        DEFAULT_PREVIEW_LIMIT,
      loaded_files:     vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let path = resolve_config_path(
      config_override
    );
    let Some(path) = path else {
      warn!(
        "no config file found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let mut cfg =
      Self::from_file(&path)?;
    cfg.loaded_files.push(path);
    Ok(cfg)
  }

  pub fn from_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text =
      fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "failed to parse {}",
          path.display()
        )
      })
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let cfg: Self = toml::from_str(text)
      .map_err(|err| {
        anyhow!("invalid config: {err}")
      })?;
    cfg.validate()?;
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .trim()
        .to_string();
      let value = v.trim();
      debug!(key = %key, value = %value, "applying override");

      match key.as_str() {
        | "timezone" => {
          self.timezone =
            if value.is_empty() {
              None
            } else {
              Some(value.to_string())
            };
        }
        | "color" => {
          self.color = parse_bool(value)
            .ok_or_else(|| {
              anyhow!(
                "invalid boolean for \
                 {key}: {value}"
              )
            })?;
        }
        | "seed" => {
          self.seed = parse_bool(value)
            .ok_or_else(|| {
              anyhow!(
                "invalid boolean for \
                 {key}: {value}"
              )
            })?;
        }
        | "default_category"
        | "default.category" => {
          self.default_category =
            value.to_string();
        }
        | "upcoming_days"
        | "upcoming.days" => {
          self.upcoming_days = value
            .parse()
            .with_context(|| {
              format!(
                "invalid number for \
                 {key}: {value}"
              )
            })?;
        }
        | "preview_limit"
        | "notify.preview" => {
          self.preview_limit = value
            .parse()
            .with_context(|| {
              format!(
                "invalid number for \
                 {key}: {value}"
              )
            })?;
        }
        | other => {
          warn!(key = %other, "unknown config override ignored");
        }
      }
    }

    self.validate()
  }

  pub fn default_filter(
    &self
  ) -> anyhow::Result<CategoryFilter> {
    self
      .default_category
      .parse()
      .context(
        "invalid default_category"
      )
  }

  pub fn view_options(
    &self
  ) -> ViewOptions {
    ViewOptions {
      upcoming_days: self
        .upcoming_days,
      preview_limit: self
        .preview_limit
    }
  }

  pub fn to_toml_string(
    &self
  ) -> anyhow::Result<String> {
    toml::to_string(self).map_err(
      |err| {
        anyhow!(
          "failed to render config: \
           {err}"
        )
      }
    )
  }

  fn validate(
    &self
  ) -> anyhow::Result<()> {
    self.default_filter()?;
    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(config_env) =
    std::env::var(CONFIG_ENV_VAR)
  {
    if config_env == "/dev/null" {
      return None;
    }
    return Some(PathBuf::from(
      config_env
    ));
  }

  let candidate = dirs::config_dir()?
    .join(CONFIG_DIR_NAME)
    .join(CONFIG_FILE_NAME);
  if candidate.exists() {
    return Some(candidate);
  }

  None
}

fn parse_bool(
  s: &str
) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}
