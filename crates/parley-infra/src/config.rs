//! Startup configuration for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! into [`GlobalConfig`], falling back to defaults when the file is missing
//! or malformed, then layers the `PARLEY_API_KEY` environment variable on
//! top. These values are the compiled defaults; runtime overrides stored in
//! the database still win over them.

use std::path::{Path, PathBuf};

use parley_types::config::GlobalConfig;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";
/// Environment variable supplying the default credential.
pub const API_KEY_ENV: &str = "PARLEY_API_KEY";

/// Load `{data_dir}/config.toml` and apply environment overrides.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config = read_config_file(data_dir).await;
    apply_api_key_env(config, std::env::var(API_KEY_ENV).ok())
}

async fn read_config_file(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// A non-blank environment credential replaces the file's one.
fn apply_api_key_env(mut config: GlobalConfig, env_value: Option<String>) -> GlobalConfig {
    if let Some(key) = env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        config.api_key = key;
    }
    config
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_DATA_DIR` environment variable
/// 2. `~/.parley`
/// 3. `./.parley` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    PathBuf::from(".parley")
}

/// Create the data directory if needed.
pub async fn ensure_data_dir(data_dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(data_dir).await
}
