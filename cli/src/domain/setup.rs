//! Backend and domain setup types.
//!
//! Pure functions only: no I/O, no async, no prompting. The deploy service
//! decides which [`SetupSource`] applies and drives the operator prompts.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::Serialize;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_PORT: u16 = 80;

/// Placeholder backend used when no real origin is configured yet.
pub const ORIGINLESS_NAME: &str = "originless";
pub const ORIGINLESS_ADDRESS: &str = "127.0.0.1";

/// Suffix of generated domain names.
pub const DOMAIN_SUFFIX: &str = "edgeship.app";

static NON_ALPHANUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[^A-Za-z0-9]+").expect("valid regex")
});

const ADJECTIVES: &[&str] = &[
    "amply", "boldly", "briskly", "calmly", "closely", "daily", "deeply", "directly", "eagerly",
    "evenly", "firmly", "freely", "gently", "gladly", "highly", "jointly", "kindly", "largely",
    "lightly", "loudly", "mainly", "merely", "neatly", "nicely", "openly", "partly", "quickly",
    "rarely", "sharply", "simply", "slowly", "solely", "surely", "truly", "vastly", "wisely",
];

const QUALITIES: &[&str] = &[
    "able", "amazed", "brave", "bright", "careful", "certain", "clever", "cosmic", "crisp",
    "curious", "daring", "eager", "exact", "fair", "famous", "fancy", "gentle", "golden", "grand",
    "happy", "honest", "lively", "lucky", "mellow", "modest", "noble", "polite", "proud", "quiet",
    "rapid", "robust", "steady", "sunny", "swift", "tidy", "vivid",
];

const NOUNS: &[&str] = &[
    "badger", "beetle", "bison", "condor", "coyote", "crane", "dingo", "dolphin", "eagle",
    "falcon", "ferret", "gazelle", "gecko", "heron", "ibex", "impala", "jackal", "koala", "lemur",
    "lynx", "marmot", "moose", "ocelot", "orca", "osprey", "otter", "panda", "puffin", "quokka",
    "raven", "salmon", "tapir", "toucan", "walrus", "wombat", "zebra",
];

// ── Types ────────────────────────────────────────────────────────────────────

/// A backend to create on the target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendSpec {
    /// Hostname or IP address. Never empty.
    pub address: String,
    pub port: u16,
    pub name: String,
    /// Label shown when confirming the entry interactively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl BackendSpec {
    /// Build a spec, defaulting the port to 80 and the name to the address slug.
    #[must_use]
    pub fn new(address: &str, port: Option<u16>, name: Option<&str>) -> Self {
        let address = address.trim().to_string();
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => backend_name_from_address(&address),
        };
        Self {
            address,
            port: port.unwrap_or(DEFAULT_PORT),
            name,
            prompt: None,
        }
    }

    /// The placeholder backend bound to `127.0.0.1:80`.
    #[must_use]
    pub fn originless() -> Self {
        Self {
            address: ORIGINLESS_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            name: ORIGINLESS_NAME.to_string(),
            prompt: None,
        }
    }
}

/// Where the backend list for this run comes from. Resolved once, never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupSource {
    /// `[[setup.backends]]` entries from the project manifest.
    Declarative(Vec<BackendSpec>),
    /// Ask the operator.
    Interactive,
    /// Interaction disabled and nothing declared: one originless backend.
    Default,
}

impl SetupSource {
    /// Declarative config, when present, always wins over prompting.
    #[must_use]
    pub fn choose(declared: Option<&[BackendSpec]>, accept_defaults: bool) -> Self {
        match declared {
            Some(specs) if !specs.is_empty() => Self::Declarative(specs.to_vec()),
            _ if accept_defaults => Self::Default,
            _ => Self::Interactive,
        }
    }
}

/// Resolved setup for a run: backends to provision, in order, plus an
/// optional domain override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupConfiguration {
    pub backends: Vec<BackendSpec>,
    pub domain: Option<String>,
}

// ── Derivations ──────────────────────────────────────────────────────────────

/// Deterministic backend name for an address: each run of non-alphanumeric
/// characters becomes `_` (`fastly.com` -> `fastly_com`).
#[must_use]
pub fn backend_name_from_address(address: &str) -> String {
    NON_ALPHANUMERIC_RE
        .replace_all(address.trim(), "_")
        .into_owned()
}

/// Generate a readable `adjective-quality-noun.edgeship.app` domain not
/// present in `existing`.
pub fn generate_domain_name(rng: &mut impl Rng, existing: &[String]) -> String {
    loop {
        let name = format!(
            "{}-{}-{}.{DOMAIN_SUFFIX}",
            ADJECTIVES.choose(rng).copied().unwrap_or("directly"),
            QUALITIES.choose(rng).copied().unwrap_or("careful"),
            NOUNS.choose(rng).copied().unwrap_or("coyote"),
        );
        if !existing.iter().any(|d| d.eq_ignore_ascii_case(&name)) {
            return name;
        }
    }
}
