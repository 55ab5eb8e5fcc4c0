//! Connection settings and caller identity for board commands.
//!
//! Each value resolves through: flag > `CARDWALL_*` env > project
//! `.cardwall/config.toml` > user config > default. Read-only commands still
//! need a token, since visible actions depend on the caller's roles.

use crate::output::{CliError, OutputMode, fail, render_error, rendered};
use cardwall_core::config::{Overrides, Settings, resolve_settings};
use cardwall_core::{BoardError, BoardSync, ErrorCode, HttpTaskApi, Identity};
use std::env;
use std::path::Path;

/// Real environment lookup; empty values count as unset.
fn real_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Resolve settings for a command run from `project_root`.
///
/// # Errors
///
/// Fails when a config file exists but cannot be read or parsed.
pub fn load_settings(project_root: &Path, overrides: &Overrides) -> anyhow::Result<Settings> {
    resolve_settings(project_root, overrides, real_env)
}

/// Decode the caller from the configured token.
fn identity_from(token: Option<&str>) -> Result<Identity, BoardError> {
    match token {
        Some(token) if !token.trim().is_empty() => Identity::from_bearer_token(token),
        _ => Err(BoardError::InvalidToken("no token configured".into())),
    }
}

/// Everything a board command needs: settings plus the chosen output mode.
pub struct Session {
    settings: Settings,
    output: OutputMode,
}

impl Session {
    pub const fn new(settings: Settings, output: OutputMode) -> Self {
        Self { settings, output }
    }

    pub const fn output(&self) -> OutputMode {
        self.output
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The caller's identity, rendering the failure when the token is
    /// missing or malformed.
    pub fn identity(&self) -> anyhow::Result<Identity> {
        identity_from(self.settings.token.as_deref()).map_err(|e| fail(self.output, e))
    }

    /// HTTP client for the configured backend.
    pub fn api(&self) -> anyhow::Result<HttpTaskApi> {
        let Some(base_url) = self.settings.base_url.as_deref() else {
            let code = ErrorCode::MissingApiUrl;
            render_error(
                self.output,
                &CliError::with_details(
                    code.message(),
                    code.hint().unwrap_or(code.message()),
                    code.code(),
                ),
            )?;
            return Err(rendered(anyhow::anyhow!("{code}: {}", code.message())));
        };

        Ok(HttpTaskApi::new(
            base_url,
            self.settings.token.clone(),
            self.settings.timeout,
        ))
    }

    /// Load the board of `service_id` as the configured caller.
    pub fn open(&self, service_id: &str) -> anyhow::Result<BoardSync<HttpTaskApi>> {
        let identity = self.identity()?;
        let api = self.api()?;
        BoardSync::open(api, &identity, service_id, self.settings.move_policy)
            .map_err(|e| fail(self.output, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardwall_core::identity::unsigned_token;
    use serde_json::json;

    #[test]
    fn missing_token_is_an_invalid_token_error() {
        let err = identity_from(None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidToken);

        let err = identity_from(Some("   ")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidToken);
    }

    #[test]
    fn token_decodes_to_identity() {
        let token = unsigned_token(&json!({ "sub": "u-7", "role": "admin" }));
        let identity = identity_from(Some(&token)).unwrap();
        assert_eq!(identity, Identity::new("u-7", "admin"));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = identity_from(Some("not-a-token")).unwrap_err();
        assert!(matches!(err, BoardError::InvalidToken(_)));
    }

    #[test]
    fn overrides_win_over_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = Overrides {
            api_url: Some("http://tracker.test/api".into()),
            token: Some("tok".into()),
        };
        let settings = load_settings(dir.path(), &overrides).unwrap();
        assert_eq!(settings.base_url.as_deref(), Some("http://tracker.test/api"));
        assert_eq!(settings.token.as_deref(), Some("tok"));
    }

    #[test]
    fn api_requires_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = load_settings(dir.path(), &Overrides::default()).unwrap();
        settings.base_url = None;
        let session = Session::new(settings, OutputMode::Text);
        let err = session.api().unwrap_err();
        assert!(crate::output::is_rendered(&err));
        assert!(format!("{err:#}").contains("E1002"));
    }
}
