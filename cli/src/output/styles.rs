//! Colours for terminal output.

use owo_colors::Style;

/// Style of each mark and link the CLI prints. Plain when colour is off.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` marks
    pub success: Style,
    /// Warnings and rollback notices
    pub warning: Style,
    /// Step arrows and informational marks
    pub info: Style,
    /// Manage and service links
    pub url: Style,
}

impl Styles {
    /// Coloured styles when `enabled`, plain ones otherwise.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            info: Style::new().cyan(),
            url: Style::new().underline().cyan(),
        }
    }
}
