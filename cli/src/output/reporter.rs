//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;
use crate::output::progress::StepSpinner;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each `step()` runs a spinner that is ticked off when the next
/// event arrives. Otherwise steps print as `"  → {message}"` lines. All
/// output is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<StepSpinner>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Tick off the running step, if any.
    pub fn finish(&self) {
        if let Some(spinner) = self.active.borrow_mut().take() {
            spinner.succeed();
        }
    }

    /// Mark the running step, if any, as the one that failed.
    pub fn fail(&self) {
        if let Some(spinner) = self.active.borrow_mut().take() {
            spinner.fail();
        }
    }

    fn print(&self, line: &str) {
        match self.active.borrow().as_ref() {
            Some(spinner) => spinner.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish();
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(StepSpinner::start(message));
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn detail(&self, message: &str) {
        if self.ctx.verbose {
            self.step(message);
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            self.finish();
            println!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            self.print(&format!("  {} {message}", "!".style(self.ctx.styles.warning)));
        }
    }

    fn verbose(&self) -> bool {
        self.ctx.verbose
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
