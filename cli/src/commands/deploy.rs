//! `edgeship deploy`: provision the service if needed, upload, and activate.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::deploy::{DeployOptions, deploy};
use crate::domain::error::DeployError;
use crate::domain::manifest::MANIFEST_FILE;
use crate::domain::version::VersionSelector;
use crate::infra::api::HttpPlatformApi;
use crate::infra::config::YamlConfigStore;
use crate::infra::manifest::TomlManifestStore;
use crate::infra::package::LocalPackageSource;
use crate::infra::prompt::DialoguerPrompter;
use crate::output::{JsonRenderer, TerminalReporter};

/// Environment variable overriding the configured API token.
pub const TOKEN_ENV: &str = "EDGESHIP_API_TOKEN";

/// Arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Service ID to deploy to (defaults to `service_id` in the manifest)
    #[arg(short, long, env = "EDGESHIP_SERVICE_ID")]
    pub service_id: Option<String>,

    /// Version to deploy to: 'latest', 'active', or a version number
    #[arg(long)]
    pub version: Option<String>,

    /// Path to the package archive (defaults to pkg/<name>.tar.gz)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Accept defaults for every prompt
    #[arg(short = 'y', long)]
    pub accept_defaults: bool,

    /// Comment recorded on a newly cloned version
    #[arg(long)]
    pub comment: Option<String>,

    /// Path to the project manifest
    #[arg(long, default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns configuration errors, a missing token, or the [`DeployError`]
/// of a failed run.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<()> {
    let store = TomlManifestStore::with_path(args.manifest);
    let manifest = store.load()?;

    let version = args
        .version
        .as_deref()
        .map(str::parse::<VersionSelector>)
        .transpose()
        .map_err(DeployError::from)?;

    let config_store = YamlConfigStore;
    let config = config_store.load()?;
    let env_token = std::env::var(TOKEN_ENV).ok();
    let Some(token) = config.token(env_token.as_deref()) else {
        anyhow::bail!(
            "no token provided. Set {TOKEN_ENV} or api.token in {}",
            config_store.path()?.display()
        );
    };
    let api = HttpPlatformApi::new(&config.api, &token)?;

    let reporter = TerminalReporter::new(&app.output);
    let result = deploy(
        &api,
        &store,
        &LocalPackageSource,
        &DialoguerPrompter,
        DeployOptions {
            reporter: &reporter,
            manifest: &manifest,
            service_id: args.service_id.as_deref(),
            version,
            package_path: args.path.as_deref(),
            accept_defaults: args.accept_defaults || app.non_interactive,
            comment: args.comment.as_deref(),
        },
    )
    .await;

    match result {
        Ok(outcome) => {
            reporter.finish();
            if app.is_json() {
                JsonRenderer::render_deploy(&outcome, &config.api.service_url(&outcome.service_id))?;
            } else {
                app.human().render_deploy(&outcome, &config.api);
            }
            Ok(())
        }
        Err(err) => {
            reporter.fail();
            if let Some(report) = err.rollback() {
                app.human().render_rollback(report);
            }
            Err(err.into())
        }
    }
}
