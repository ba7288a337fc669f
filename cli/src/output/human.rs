//! Human-readable terminal renderer.

use edgeship_common::ApiConfig;
use owo_colors::OwoColorize as _;

use crate::application::services::deploy::{DeployOutcome, DeployStatus};
use crate::domain::manifest::MANIFEST_FILE;
use crate::domain::undo::RollbackReport;
use crate::output::OutputContext;

/// Closing line of a deploy run.
#[must_use]
pub fn summary(outcome: &DeployOutcome) -> String {
    let what = match outcome.status {
        DeployStatus::Skipped => "Nothing to deploy",
        DeployStatus::Activated => "Deployed package",
    };
    format!(
        "{what} (service {}, version {})",
        outcome.service_id, outcome.version
    )
}

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("edgeship {version}");
    }

    /// Render the end of a successful deploy run.
    pub fn render_deploy(&self, outcome: &DeployOutcome, api: &ApiConfig) {
        if self.ctx.quiet {
            return;
        }
        if outcome.status == DeployStatus::Skipped {
            self.ctx.info(&summary(outcome));
            return;
        }

        println!();
        println!("Manage this service at:");
        println!(
            "\t{}",
            api.service_url(&outcome.service_id)
                .style(self.ctx.styles.url)
        );
        if let Some(domain) = &outcome.domain {
            println!();
            println!("View this service at:");
            println!(
                "\t{}",
                format!("https://{domain}").style(self.ctx.styles.url)
            );
        }
        println!();
        self.ctx.success(&summary(outcome));
    }

    /// Render what was undone after a failed run.
    pub fn render_rollback(&self, report: &RollbackReport) {
        if report.attempted.is_empty() {
            return;
        }
        let undone = report.attempted.len() - report.failures.len();
        self.ctx.warn(&format!(
            "Rolled back {undone} of {} resource(s) created by this run",
            report.attempted.len()
        ));
        if report.service_id_cleared {
            self.ctx
                .info(&format!("Service ID cleared from {MANIFEST_FILE}"));
        }
    }
}
