//! Runtime configuration
//!
//! Defaults come from `AvailabilityConfig::default()`. Each `UF_*` variable
//! overrides one setting; values that fail to parse are reported and ignored.
//!
//! | Variable               | Setting                     |
//! |------------------------|-----------------------------|
//! | `UF_EXPECTED_ELEMENTS` | filter capacity             |
//! | `UF_TARGET_FPR`        | target false positive rate  |
//! | `UF_LOOKUP_TIMEOUT_MS` | authoritative lookup budget |
//! | `UF_SNAPSHOT_PATH`     | snapshot file for restarts  |
//! | `UF_LOG_LEVEL`         | tracing max level           |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::Level;
use username_filter::{AvailabilityConfig, AvailabilityConfigBuilder, FilterError};

pub const ENV_EXPECTED_ELEMENTS: &str = "UF_EXPECTED_ELEMENTS";
pub const ENV_TARGET_FPR: &str = "UF_TARGET_FPR";
pub const ENV_LOOKUP_TIMEOUT_MS: &str = "UF_LOOKUP_TIMEOUT_MS";
pub const ENV_SNAPSHOT_PATH: &str = "UF_SNAPSHOT_PATH";
pub const ENV_LOG_LEVEL: &str = "UF_LOG_LEVEL";

/// Everything the runtime needs to start
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub availability: AvailabilityConfig,
    /// Where the filter snapshot is read on start and written on shutdown
    pub snapshot_path: Option<PathBuf>,
    pub log_level: Level,
}

/// Configuration plus the overrides that were ignored
///
/// Logging is not up yet while the environment is read, so problems are
/// collected and reported by the caller.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: RuntimeConfig,
    pub ignored: Vec<String>,
}

/// Read the configuration from the process environment
pub fn load_config() -> Result<LoadedConfig, FilterError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Read the configuration through an arbitrary variable lookup
pub fn load_config_from<F>(var: F) -> Result<LoadedConfig, FilterError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut ignored = Vec::new();
    let mut builder = AvailabilityConfigBuilder::new();

    if let Some(n) = parse_var::<usize, _>(&var, ENV_EXPECTED_ELEMENTS, &mut ignored) {
        builder = builder.expected_elements(n);
    }
    if let Some(fpr) = parse_var::<f64, _>(&var, ENV_TARGET_FPR, &mut ignored) {
        builder = builder.target_fpr(fpr);
    }
    if let Some(ms) = parse_var::<u64, _>(&var, ENV_LOOKUP_TIMEOUT_MS, &mut ignored) {
        builder = builder.lookup_timeout(Duration::from_millis(ms));
    }
    let log_level = parse_var::<Level, _>(&var, ENV_LOG_LEVEL, &mut ignored).unwrap_or(Level::INFO);

    let snapshot_path = var(ENV_SNAPSHOT_PATH)
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from);

    Ok(LoadedConfig {
        config: RuntimeConfig {
            availability: builder.build()?,
            snapshot_path,
            log_level,
        },
        ignored,
    })
}

fn parse_var<T, F>(var: &F, key: &str, ignored: &mut Vec<String>) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            ignored.push(format!("{}={:?} is not valid, using the default", key, raw));
            None
        }
    }
}
