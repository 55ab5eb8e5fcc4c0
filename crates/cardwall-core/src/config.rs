use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ErrorCode;
use crate::roles::MovePolicy;
use crate::stats::DEFAULT_AT_RISK_THRESHOLD;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One config file. Every field is optional so files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSection {
    #[serde(default)]
    pub restrict_moves: Option<bool>,
    #[serde(default)]
    pub at_risk_threshold: Option<f64>,
}

impl ConfigFile {
    /// Fill fields missing from `self` with those of `lower`.
    #[must_use]
    pub fn layered_over(self, lower: Self) -> Self {
        Self {
            api: ApiSection {
                base_url: self.api.base_url.or(lower.api.base_url),
                token: self.api.token.or(lower.api.token),
                timeout_secs: self.api.timeout_secs.or(lower.api.timeout_secs),
            },
            board: BoardSection {
                restrict_moves: self.board.restrict_moves.or(lower.board.restrict_moves),
                at_risk_threshold: self
                    .board
                    .at_risk_threshold
                    .or(lower.board.at_risk_threshold),
            },
            output: self.output.or(lower.output),
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
    pub move_policy: MovePolicy,
    pub at_risk_threshold: f64,
    pub output: Option<String>,
}

impl Settings {
    /// # Errors
    ///
    /// Fails when no base URL came from any source.
    pub fn require_base_url(&self) -> Result<&str> {
        self.base_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "{}: {}",
                ErrorCode::MissingApiUrl,
                ErrorCode::MissingApiUrl.message()
            )
        })
    }
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cardwall/config.toml")
}

fn read_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ConfigFile>(&content).with_context(|| {
        format!(
            "{}: failed to parse {}",
            ErrorCode::ConfigParseError,
            path.display()
        )
    })
}

pub fn load_project_config(project_root: &Path) -> Result<ConfigFile> {
    read_config(&project_config_path(project_root))
}

pub fn load_user_config() -> Result<ConfigFile> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    read_config(&config_dir.join("cardwall/config.toml"))
}

/// Resolve settings from flags, environment, project file, user file and
/// defaults, in that order of precedence.
///
/// `env` looks up an environment variable; empty values count as unset.
pub fn resolve_settings(
    project_root: &Path,
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let files = load_project_config(project_root)?.layered_over(load_user_config()?);
    resolve_with(files, overrides, env)
}

fn resolve_with(
    files: ConfigFile,
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let move_policy = if files.board.restrict_moves.unwrap_or(false) {
        MovePolicy::ChiefOrAdmin
    } else {
        MovePolicy::AnyViewer
    };

    let at_risk_threshold = files
        .board
        .at_risk_threshold
        .unwrap_or(DEFAULT_AT_RISK_THRESHOLD);
    if !(0.0..=100.0).contains(&at_risk_threshold) {
        anyhow::bail!(
            "{}: board.at_risk_threshold must be between 0 and 100, got {at_risk_threshold}",
            ErrorCode::ConfigParseError
        );
    }

    Ok(Settings {
        base_url: overrides
            .api_url
            .clone()
            .or_else(|| env("CARDWALL_API_URL"))
            .or(files.api.base_url),
        token: overrides
            .token
            .clone()
            .or_else(|| env("CARDWALL_TOKEN"))
            .or(files.api.token),
        timeout: Duration::from_secs(files.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        move_policy,
        at_risk_threshold,
        output: env("FORMAT").or(files.output),
    })
}
