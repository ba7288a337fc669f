//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, plus the renderer for successful results.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::deploy::DeployOutcome;
use crate::domain::error::{ConfigError, DeployError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for a command failure.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(deploy) = err.downcast_ref::<DeployError>() {
        return deploy.code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "configuration_error";
    }
    "error"
}

/// Renders command results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "version": version }))
    }

    /// Render a deploy outcome together with its manage URL.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deploy(outcome: &DeployOutcome, manage_url: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Output<'a> {
            #[serde(flatten)]
            outcome: &'a DeployOutcome,
            manage_url: &'a str,
        }
        Self::print(&Output {
            outcome,
            manage_url,
        })
    }

    fn print(value: &impl Serialize) -> Result<()> {
        let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{out}");
        Ok(())
    }
}
