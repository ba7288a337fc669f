//! Version command

use anyhow::Result;

use crate::app::AppContext;
use crate::output::JsonRenderer;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if app.is_json() {
        JsonRenderer::render_version(version)
    } else {
        app.human().render_version(version);
        Ok(())
    }
}
