//! Global configuration loader for ragdesk.
//!
//! Reads `config.toml` from the data directory (`~/.ragdesk/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed. API keys never live in the file; they are
//! read from the environment variable the file names.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use ragdesk_types::config::GlobalConfig;
use ragdesk_types::error::ConfigError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RAGDESK_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `RAGDESK_DATA_DIR` environment variable
/// 2. `~/.ragdesk`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".ragdesk");
    }

    PathBuf::from(".ragdesk")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
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

/// Read an API key from the named environment variable.
///
/// Missing, empty and non-Unicode values all count as missing.
pub fn resolve_api_key(env_var: &str) -> Result<SecretString, ConfigError> {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(ConfigError::MissingCredential(env_var.to_string())),
    }
}

/// LanceDB directory: the configured path, or `{data_dir}/vector_store`.
pub fn vector_store_path(config: &GlobalConfig, data_dir: &Path) -> PathBuf {
    config
        .store
        .path
        .clone()
        .unwrap_or_else(|| data_dir.join("vector_store"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragdesk_types::config::{ClassifierKind, StoreBackend};
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.llm.model, "gpt-5-mini");
        assert_eq!(config.retrieval.product_top_n, 10);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[llm]
model = "gpt-4o-mini"

[classifier]
kind = "keyword"

[store]
backend = "memory"
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.classifier.kind, ClassifierKind::Keyword);
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.llm.model, "gpt-5-mini");
    }

    #[test]
    fn resolve_api_key_reports_variable_name() {
        let err = resolve_api_key("RAGDESK_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref name) if name == "RAGDESK_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn resolve_api_key_reads_environment() {
        // PATH is always present in test environments.
        let key = resolve_api_key("PATH").unwrap();
        assert!(!key.expose_secret().is_empty());
    }

    #[test]
    fn vector_store_path_defaults_under_data_dir() {
        let config = GlobalConfig::default();
        let path = vector_store_path(&config, Path::new("/tmp/ragdesk"));
        assert_eq!(path, PathBuf::from("/tmp/ragdesk/vector_store"));
    }
}
