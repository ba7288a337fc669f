//! Per-step spinners using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];
const RUNNING: &str = "  {spinner:.cyan} {msg}";
const DONE: &str = "  {prefix} {msg}";

/// Spinner for one deploy step. The message stays on screen once finished.
pub struct StepSpinner {
    bar: ProgressBar,
}

impl StepSpinner {
    /// Start spinning next to `message`.
    #[must_use]
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(style(RUNNING).tick_strings(TICKS));
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Print above the spinner without garbling it.
    pub fn suspend(&self, f: impl FnOnce()) {
        self.bar.suspend(f);
    }

    /// Replace the spinner with `✓`.
    pub fn succeed(self) {
        self.settle("✓");
    }

    /// Replace the spinner with `✗`.
    pub fn fail(self) {
        self.settle("✗");
    }

    fn settle(self, mark: &str) {
        self.bar.set_style(style(DONE));
        self.bar.set_prefix(mark.to_string());
        self.bar.finish();
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
