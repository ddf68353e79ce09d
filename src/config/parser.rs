use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variables that override values from the configuration file
pub const ENV_SEED_URL: &str = "SEED_URL";
pub const ENV_MAX_PAGES: &str = "MAX_PAGES";
pub const ENV_DB_ACCESS: &str = "DB_ACCESS";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";
pub const ENV_TIMEOUT: &str = "TIMEOUT";

/// Loads and parses a configuration file from the given path
///
/// Values from the process environment (see the `ENV_*` constants) are
/// applied on top of the file before validation, so a `.env` file loaded by
/// the binary can point the crawler at a different seed without editing the
/// TOML.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kumo_search::config::load_config;
///
/// let config = load_config(Path::new("kumo.toml")).unwrap();
/// println!("Seed: {}", config.crawler.seed_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides using the given lookup function
///
/// The lookup is injected so callers (and tests) are not tied to the real
/// process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(seed) = lookup(ENV_SEED_URL).filter(|s| !s.is_empty()) {
        config.crawler.seed_url = seed;
    }

    if let Some(raw) = lookup(ENV_MAX_PAGES).filter(|s| !s.is_empty()) {
        config.crawler.max_pages = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: ENV_MAX_PAGES.to_string(),
            value: raw.clone(),
        })?;
    }

    if let Some(raw) = lookup(ENV_DB_ACCESS).filter(|s| !s.is_empty()) {
        config.database.enabled = raw.trim() == "true";
    }

    if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|s| !s.is_empty()) {
        config.database.path = path;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT).filter(|s| !s.is_empty()) {
        config.crawler.fetch_timeout_secs =
            raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT.to_string(),
                value: raw.clone(),
            })?;
    }

    Ok(())
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so separate crawl runs can be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
