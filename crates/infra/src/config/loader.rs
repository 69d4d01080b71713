//! Configuration loader
//!
//! Loads LoginKit configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file if present (existing variables win)
//! 2. Attempts to load from environment variables
//! 3. If `LOGINKIT_CLIENT_ID` is missing, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `LOGINKIT_CLIENT_ID` (required): OAuth2 client id
//! - `LOGINKIT_TOKEN_URL`: token endpoint
//! - `LOGINKIT_REDIRECT_URI`: redirect URI sent with refresh grants (empty
//!   string disables it)
//! - `LOGINKIT_HTTP_TIMEOUT`: token endpoint timeout in seconds
//! - `LOGINKIT_STORAGE`: `memory`, `keychain` or `file`
//! - `LOGINKIT_KEYCHAIN_SERVICE`: keychain service name
//! - `LOGINKIT_SESSION_PATH`: session file for the `file` backend
//! - `LOGINKIT_LOG_LEVEL`: default tracing filter
//! - `LOGINKIT_LOG_FORMAT`: `text` or `json`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` or `./loginkit.{json,toml}` (current directory)
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use loginkit_domain::{
    Config, IdentityConfig, LogFormat, LoggingConfig, LoginKitError, Result, StorageBackend,
    StorageConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "loginkit.json", "loginkit.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `LoginKitError::Config` if configuration cannot be loaded from
/// either source or a value is invalid.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `LOGINKIT_CLIENT_ID` is required; every other value falls back to
/// its default.
///
/// # Errors
/// Returns `LoginKitError::Config` if the client id is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let client_id = env_var("LOGINKIT_CLIENT_ID")?;
    let token_url = env_or("LOGINKIT_TOKEN_URL", defaults.identity.token_url);
    let redirect_uri = match std::env::var("LOGINKIT_REDIRECT_URI") {
        Ok(value) if value.is_empty() => None,
        Ok(value) => Some(value),
        Err(_) => defaults.identity.redirect_uri,
    };
    let timeout_seconds = env_parse("LOGINKIT_HTTP_TIMEOUT", defaults.identity.timeout_seconds)?;

    let backend = env_parse::<StorageBackend>("LOGINKIT_STORAGE", defaults.storage.backend)?;
    let service_name = env_or("LOGINKIT_KEYCHAIN_SERVICE", defaults.storage.service_name);
    let path = env_or("LOGINKIT_SESSION_PATH", defaults.storage.path);

    let level = env_or("LOGINKIT_LOG_LEVEL", defaults.logging.level);
    let format = env_parse::<LogFormat>("LOGINKIT_LOG_FORMAT", defaults.logging.format)?;

    Ok(Config {
        identity: IdentityConfig { token_url, client_id, redirect_uri, timeout_seconds },
        storage: StorageConfig { backend, service_name, path },
        logging: LoggingConfig { level, format },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LoginKitError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LoginKitError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LoginKitError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LoginKitError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`); absent
/// sections and fields take their defaults.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LoginKitError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LoginKitError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(LoginKitError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots.iter().flat_map(|root| candidates_under(root)).find(|path| path.exists())
}

fn candidates_under(root: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> =
        CONFIG_FILE_NAMES.iter().map(|name| root.join(name)).collect();
    for parent in ["..", "../.."] {
        candidates.push(root.join(parent).join("config.json"));
        candidates.push(root.join(parent).join("config.toml"));
    }
    candidates
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        LoginKitError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Parse an optional environment variable, falling back to `default`
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| LoginKitError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 9] = [
        "LOGINKIT_CLIENT_ID",
        "LOGINKIT_TOKEN_URL",
        "LOGINKIT_REDIRECT_URI",
        "LOGINKIT_HTTP_TIMEOUT",
        "LOGINKIT_STORAGE",
        "LOGINKIT_KEYCHAIN_SERVICE",
        "LOGINKIT_SESSION_PATH",
        "LOGINKIT_LOG_LEVEL",
        "LOGINKIT_LOG_FORMAT",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LOGINKIT_CLIENT_ID", "57");
        std::env::set_var("LOGINKIT_TOKEN_URL", "https://id.example.com/token");
        std::env::set_var("LOGINKIT_REDIRECT_URI", "");
        std::env::set_var("LOGINKIT_HTTP_TIMEOUT", "5");
        std::env::set_var("LOGINKIT_STORAGE", "file");
        std::env::set_var("LOGINKIT_SESSION_PATH", "/tmp/session.json");
        std::env::set_var("LOGINKIT_LOG_LEVEL", "debug");
        std::env::set_var("LOGINKIT_LOG_FORMAT", "JSON");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.identity.client_id, "57");
        assert_eq!(config.identity.token_url, "https://id.example.com/token");
        assert!(config.identity.redirect_uri.is_none());
        assert_eq!(config.identity.timeout_seconds, 5);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, "/tmp/session.json");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("LOGINKIT_CLIENT_ID", "57");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        let defaults = Config::default();
        assert_eq!(config.identity.redirect_uri, defaults.identity.redirect_uri);
        assert_eq!(config.storage, defaults.storage);
        assert_eq!(config.logging, defaults.logging);
    }

    #[test]
    fn test_load_from_env_missing_client_id() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(
            matches!(err, LoginKitError::Config(ref msg) if msg.contains("LOGINKIT_CLIENT_ID"))
        );
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("LOGINKIT_CLIENT_ID", "57");
        std::env::set_var("LOGINKIT_HTTP_TIMEOUT", "soon");
        let timeout = load_from_env();

        std::env::set_var("LOGINKIT_HTTP_TIMEOUT", "5");
        std::env::set_var("LOGINKIT_STORAGE", "sqlite");
        let storage = load_from_env();
        clear_env();

        assert!(matches!(timeout, Err(LoginKitError::Config(_))));
        assert!(matches!(storage, Err(LoginKitError::Config(ref msg)) if msg.contains("sqlite")));
    }

    #[test]
    fn test_load_from_file_json() {
        let (_temp, path) = temp_config(
            r#"{
                "identity": { "client_id": "42", "timeout_seconds": 10 },
                "storage": { "backend": "memory" }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("config from JSON");
        assert_eq!(config.identity.client_id, "42");
        assert_eq!(config.identity.timeout_seconds, 10);
        assert_eq!(config.storage.backend, StorageBackend::Memory);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_temp, path) = temp_config(
            r#"
[identity]
client_id = "42"
redirect_uri = "app://callback"

[logging]
level = "loginkit_core=trace"
format = "json"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("config from TOML");
        assert_eq!(config.identity.redirect_uri.as_deref(), Some("app://callback"));
        assert_eq!(config.logging.level, "loginkit_core=trace");
        assert_eq!(config.logging.format, LogFormat::Json);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/config.json"))).unwrap_err();
        assert!(matches!(err, LoginKitError::Config(_)));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_temp, path) = temp_config(r#"{ "identity": "#, "json");

        assert!(load_from_file(Some(path.clone())).is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(matches!(result, Err(LoginKitError::Config(ref msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_candidates_cover_parent_directories() {
        let candidates = candidates_under(Path::new("/srv/app"));
        assert_eq!(candidates[0], PathBuf::from("/srv/app/config.json"));
        assert!(candidates.contains(&PathBuf::from("/srv/app/loginkit.toml")));
        assert!(candidates.contains(&PathBuf::from("/srv/app/../../config.toml")));
    }
}
