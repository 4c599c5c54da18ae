// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CMS_TOKEN_ENV: &str = "TOOLHUB_CMS_TOKEN";
pub const DATABASE_URL_ENV: &str = "TOOLHUB_DATABASE_URL";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// Origin of the better-auth compatible service, without the `/api/auth` suffix.
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CmsConfig {
    pub endpoint: String,
    #[serde(default)]
    pub mutation_token: Option<String>,
    #[serde(default = "default_tag_settle_delay_ms")]
    pub tag_settle_delay_ms: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl CmsConfig {
    pub fn tag_settle_delay(&self) -> Duration {
        Duration::from_millis(self.tag_settle_delay_ms)
    }
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_tag_settle_delay_ms() -> u64 {
    300
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> usize {
    8
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub cms: CmsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub cms: CmsConfig,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let mut config = Self::load(root)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()
    }

    /// Secrets may be supplied through the environment instead of config.yaml.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(CMS_TOKEN_ENV).filter(|value| !value.trim().is_empty()) {
            self.cms.mutation_token = Some(token);
        }
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.database.url = Some(url);
        }
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_logging(&self.logging)?;
        Self::validate_auth(&self.auth)?;
        Self::validate_cms(&self.cms)?;
        Self::validate_database(&self.database)?;

        if self.cms.mutation_token.is_none() {
            warn!(
                "No CMS mutation token configured (cms.mutation_token or {}); blog writes will fail",
                CMS_TOKEN_ENV
            );
        }
        if self.database.url.is_none() {
            warn!(
                "No database url configured (database.url or {}); using the in-memory store",
                DATABASE_URL_ENV
            );
        }

        Ok(ValidatedConfig {
            app: self.app,
            server: self.server,
            logging: self.logging,
            auth: self.auth,
            cms: self.cms,
            database: self.database,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if !(1..=64).contains(&server.workers) {
            return Err(ConfigError::ValidationError(format!(
                "server.workers must be between 1 and 64, got: {}",
                server.workers
            )));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let level = logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                logging.level
            )));
        }
        Ok(())
    }

    fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
        validate_http_url("auth.base_url", &auth.base_url)?;
        validate_timeout("auth.timeout_seconds", auth.timeout_seconds)
    }

    fn validate_cms(cms: &CmsConfig) -> Result<(), ConfigError> {
        validate_http_url("cms.endpoint", &cms.endpoint)?;
        validate_timeout("cms.timeout_seconds", cms.timeout_seconds)?;
        if cms.tag_settle_delay_ms > 10_000 {
            return Err(ConfigError::ValidationError(format!(
                "cms.tag_settle_delay_ms must be at most 10000, got: {}",
                cms.tag_settle_delay_ms
            )));
        }
        if let Some(token) = cms.mutation_token.as_deref()
            && token.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "cms.mutation_token cannot be blank; remove it or set a token".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
        if !(1..=256).contains(&database.max_connections) {
            return Err(ConfigError::ValidationError(format!(
                "database.max_connections must be between 1 and 256, got: {}",
                database.max_connections
            )));
        }
        if let Some(url) = database.url.as_deref()
            && !(url.starts_with("postgres://") || url.starts_with("postgresql://"))
        {
            return Err(ConfigError::ValidationError(
                "database.url must start with postgres:// or postgresql://".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a fully qualified URL starting with http:// or https://",
            field
        )));
    }
    Ok(())
}

fn validate_timeout(field: &str, seconds: u64) -> Result<(), ConfigError> {
    if !(1..=300).contains(&seconds) {
        return Err(ConfigError::ValidationError(format!(
            "{} must be between 1 and 300, got: {}",
            field, seconds
        )));
    }
    Ok(())
}

impl ValidatedConfig {
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }

    pub fn bind_address(&self) -> (&str, u16) {
        (self.server.host.as_str(), self.server.port)
    }
}
