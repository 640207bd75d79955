//!
//! Registry configuration and the process-wide verbosity flag.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ConfigError;
use crate::primitives::Prefixes;

/// Tracing target of the generated-operation trace.
pub const GENERATED_TARGET: &str = "cando::generated";

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Turns the generated-operation trace on or off for the whole process.
pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Emits an `info!` event under [`GENERATED_TARGET`] when verbosity is on.
macro_rules! generated {
    ($($arg:tt)+) => {
        if $crate::config::is_verbose() {
            tracing::info!(target: "cando::generated", $($arg)+);
        }
    };
}
pub(crate) use generated;

/// Tunables for a [`crate::registry::Registry`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Replace a kind's rule on redefinition instead of failing.
    pub allow_redefinition: bool,
    /// Label pair installed for kinds that do not name their own.
    pub default_prefixes: Prefixes,
    /// Sets the process-wide verbosity flag when the registry is built.
    pub verbose: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            allow_redefinition: false,
            default_prefixes: Prefixes::default(),
            verbose: false,
        }
    }
}

impl RegistryConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        config.default_prefixes.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(feature = "trace-init")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
