use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,

    /// File the config was read from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// SeaORM connection URL (`sqlite:` or `postgres://`)
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/warden.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    /// Random bytes per bearer token; the token is their hex encoding.
    pub token_bytes: usize,

    /// Rehash bcrypt or stale Argon2 hashes with the current params on login
    pub auto_migrate_password_hashes: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            token_bytes: 64,
            auto_migrate_password_hashes: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

const MIN_TOKEN_BYTES: usize = 16;

impl Config {
    /// Load from `$WARDEN_CONFIG` or the first config file found, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(explicit) = std::env::var("WARDEN_CONFIG") {
            Self::load_from_path(Path::new(&explicit))?
        } else {
            Self::load_from_search_paths()?
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_search_paths() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("WARDEN_DATABASE_URL") {
            self.general.database_path = url;
        }

        if let Some(port) = lookup("WARDEN_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid WARDEN_PORT value: {port}"),
            }
        }

        if let Some(level) = lookup("WARDEN_LOG_LEVEL") {
            self.general.log_level = level;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("warden").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".warden").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.security.token_bytes < MIN_TOKEN_BYTES {
            anyhow::bail!(
                "security.token_bytes must be at least {MIN_TOKEN_BYTES} (got {})",
                self.security.token_bytes
            );
        }

        argon2::Params::new(
            self.security.argon2_memory_cost_kib,
            self.security.argon2_time_cost,
            self.security.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database_path, "sqlite:data/warden.db");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.token_bytes, 64);
        assert!(config.security.auto_migrate_password_hashes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[security]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            argon2_time_cost = 4
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.argon2_time_cost, 4);

        assert_eq!(config.security.argon2_memory_cost_kib, 8192);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_from_path_records_source() {
        let dir = std::env::temp_dir().join(format!("warden-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = Config::default();
        config.server.port = 9191;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.port, 9191);
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        assert!(!std::fs::read_to_string(&path).unwrap().contains("source"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_validate_rejects_short_tokens() {
        let mut config = Config::default();
        config.security.token_bytes = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_argon2_params() {
        let mut config = Config::default();
        config.security.argon2_time_cost = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WARDEN_DATABASE_URL", "sqlite::memory:"),
            ("WARDEN_PORT", "9000"),
            ("WARDEN_LOG_LEVEL", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.general.database_path, "sqlite::memory:");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "WARDEN_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 8080);
    }
}
