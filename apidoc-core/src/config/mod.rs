mod loader;
pub mod value;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use value::{ConfigValue, FromConfigValue};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from YAML files, `.env` files, and
/// environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml`
/// 2. `application-{profile}.yaml`
/// 3. `.env` (loaded into the process environment)
/// 4. `.env.{profile}`
/// 5. Environment variables (`REDOC_DOCS_PATH` overrides `redoc.docs_path`)
///
/// An environment variable matches a key when the key, upper-cased with `.`
/// replaced by `_`, equals the variable name.
///
/// `.env` files never overwrite already-set environment variables. The profile
/// is `APIDOC_PROFILE` if set, otherwise the argument.
#[derive(Debug, Clone)]
pub struct AppConfig {
    values: HashMap<String, ConfigValue>,
    env: HashMap<String, ConfigValue>,
    profile: String,
}

impl AppConfig {
    /// Load configuration for `profile` from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), profile)
    }

    /// Load configuration for `profile`, looking for files in `dir`.
    pub fn load_from(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let active_profile =
            std::env::var("APIDOC_PROFILE").unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();
        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(&profile_file(dir, &active_profile), &mut values)?;

        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        let env = std::env::vars()
            .map(|(name, value)| (name, ConfigValue::String(value)))
            .collect();

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");
        Ok(AppConfig {
            values,
            env,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string, without touching files or the environment.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(AppConfig {
            values,
            env: HashMap::new(),
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        AppConfig {
            values: HashMap::new(),
            env: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    /// Set a value programmatically. Takes precedence over the environment.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.env.remove(&env_name(key));
        self.values.insert(key.to_string(), value);
    }

    fn lookup(&self, key: &str) -> Option<&ConfigValue> {
        self.env.get(&env_name(key)).or_else(|| self.values.get(key))
    }

    /// Get a typed value for the given dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .lookup(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning a default if the key is missing or mistyped.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Get a typed value if the key is present.
    ///
    /// A missing key is `Ok(None)`; a present but mistyped key is an error.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.lookup(key) {
            Some(value) => V::from_config_value(value, key).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

/// `redoc.docs_path` -> `REDOC_DOCS_PATH`
fn env_name(key: &str) -> String {
    key.replace('.', "_").to_uppercase()
}

/// Path of the profile-specific YAML file for `profile` inside `dir`.
pub fn profile_file(dir: &Path, profile: &str) -> PathBuf {
    dir.join(format!("application-{profile}.yaml"))
}
