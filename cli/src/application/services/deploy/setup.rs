//! Setup loading: decide which domain and backends this run must create.
//!
//! Declared `[[setup.backends]]` entries win over prompting. With interaction
//! disabled and nothing declared, a single originless backend is used.

use rand::thread_rng;
use tracing::debug;

use crate::application::ports::{BackendApi, DomainApi, ProgressReporter, Prompter};
use crate::domain::error::{ConfigError, DeployError, ProvisionError};
use crate::domain::manifest::Manifest;
use crate::domain::setup::{
    BackendSpec, DEFAULT_PORT, ORIGINLESS_NAME, SetupConfiguration, SetupSource,
    backend_name_from_address, generate_domain_name,
};
use crate::domain::version::ServiceVersion;

const BACKEND_PROMPT: &str =
    "Backend (hostname or IP address, or 'originless'): [leave blank to stop adding backends]";
const PORT_PROMPT: &str = "Backend port number";
const NAME_PROMPT: &str = "Backend name";
const DOMAIN_PROMPT: &str = "Domain";

/// Invalid port answers tolerated before giving up.
const PORT_ATTEMPTS: usize = 3;

/// What the provisioner has to create, plus what already exists remotely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupPlan {
    /// Resources to create, in order. `domain` is `None` when one exists.
    pub create: SetupConfiguration,
    /// First domain already bound to the target version.
    pub existing_domain: Option<String>,
}

impl SetupPlan {
    /// The domain the deployed service is reachable at.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.create
            .domain
            .as_deref()
            .or(self.existing_domain.as_deref())
    }
}

/// Build the setup plan for the run.
///
/// `target` is `None` when the service does not exist yet; in that case no
/// remote call is made.
///
/// # Errors
///
/// `ListDomains`/`ListBackends` when discovery fails, and `ConfigError` when
/// the operator gives no usable backend.
pub async fn load_setup(
    api: &(impl DomainApi + BackendApi),
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    manifest: &Manifest,
    accept_defaults: bool,
    target: Option<&ServiceVersion>,
) -> Result<SetupPlan, DeployError> {
    let (existing_domains, existing_backends) = match target {
        Some(v) => {
            let domains = api
                .list_domains(&v.service_id, v.number)
                .await
                .map_err(ProvisionError::ListDomains)?;
            let backends = api
                .list_backends(&v.service_id, v.number)
                .await
                .map_err(ProvisionError::ListBackends)?;
            (
                domains.into_iter().map(|d| d.name).collect::<Vec<_>>(),
                backends.into_iter().map(|b| b.name).collect::<Vec<_>>(),
            )
        }
        None => (Vec::new(), Vec::new()),
    };
    debug!(
        domains = existing_domains.len(),
        backends = existing_backends.len(),
        "discovered existing setup"
    );

    let domain = if existing_domains.is_empty() {
        Some(resolve_domain(
            prompter,
            manifest.declared_domain(),
            accept_defaults || target.is_some(),
            &existing_domains,
        )?)
    } else {
        None
    };

    let source = SetupSource::choose(manifest.declared_backends(), accept_defaults);
    let backends = match source {
        SetupSource::Declarative(specs) => {
            let missing: Vec<BackendSpec> = specs
                .into_iter()
                .filter(|s| !existing_backends.iter().any(|name| *name == s.name))
                .collect();
            if accept_defaults {
                missing
            } else {
                confirm_declared(prompter, reporter, missing)?
            }
        }
        _ if !existing_backends.is_empty() => Vec::new(),
        SetupSource::Interactive => prompt_backends(prompter, reporter)?,
        SetupSource::Default => vec![BackendSpec::originless()],
    };

    Ok(SetupPlan {
        create: SetupConfiguration { backends, domain },
        existing_domain: existing_domains.into_iter().next(),
    })
}

fn resolve_domain(
    prompter: &impl Prompter,
    declared: Option<&str>,
    skip_prompt: bool,
    existing: &[String],
) -> Result<String, ConfigError> {
    if let Some(domain) = declared {
        return Ok(domain.to_string());
    }
    let generated = generate_domain_name(&mut thread_rng(), existing);
    if skip_prompt {
        return Ok(generated);
    }
    let answer = prompter
        .input(DOMAIN_PROMPT, Some(&generated))
        .map_err(ConfigError::Prompt)?;
    Ok(non_blank(answer).unwrap_or(generated))
}

/// Walk each declared entry, letting the operator override address and port.
fn confirm_declared(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    specs: Vec<BackendSpec>,
) -> Result<Vec<BackendSpec>, ConfigError> {
    specs
        .into_iter()
        .map(|spec| {
            let label = spec
                .prompt
                .clone()
                .unwrap_or_else(|| format!("Origin server for '{}'", spec.name));
            let address = prompter
                .input(&label, Some(&spec.address))
                .map_err(ConfigError::Prompt)?;
            let address = non_blank(address).unwrap_or_else(|| spec.address.clone());
            let port = prompt_port(prompter, reporter, spec.port)?;
            Ok(BackendSpec {
                address,
                port,
                ..spec
            })
        })
        .collect()
}

/// Ask for backends until a blank answer.
fn prompt_backends(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<Vec<BackendSpec>, ConfigError> {
    let mut backends = Vec::new();
    loop {
        let answer = prompter
            .input(BACKEND_PROMPT, None)
            .map_err(ConfigError::Prompt)?;
        let Some(address) = non_blank(answer) else {
            break;
        };
        if address.eq_ignore_ascii_case(ORIGINLESS_NAME) {
            backends.push(BackendSpec::originless());
            continue;
        }
        let port = prompt_port(prompter, reporter, DEFAULT_PORT)?;
        let slug = backend_name_from_address(&address);
        let name = prompter
            .input(NAME_PROMPT, Some(&slug))
            .map_err(ConfigError::Prompt)?;
        backends.push(BackendSpec::new(&address, Some(port), non_blank(name).as_deref()));
    }
    if backends.is_empty() {
        return Err(ConfigError::NoBackendConfigured);
    }
    Ok(backends)
}

fn prompt_port(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    default: u16,
) -> Result<u16, ConfigError> {
    let default_text = default.to_string();
    let mut last = String::new();
    for _ in 0..PORT_ATTEMPTS {
        let answer = prompter
            .input(PORT_PROMPT, Some(&default_text))
            .map_err(ConfigError::Prompt)?;
        let Some(answer) = non_blank(answer) else {
            return Ok(default);
        };
        match parse_port(&answer) {
            Some(port) => return Ok(port),
            None => {
                reporter.warn(&format!("invalid port number '{answer}'"));
                last = answer;
            }
        }
    }
    Err(ConfigError::InvalidPort(last))
}

fn parse_port(value: &str) -> Option<u16> {
    value.parse::<u16>().ok().filter(|p| *p != 0)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
