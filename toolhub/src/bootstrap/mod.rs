// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{Config, ConfigError, ValidatedConfig};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod config;

#[derive(Debug)]
pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_root: PathBuf,
    pub created_config: bool,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Io(std::io::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Io(err) => write!(f, "Bootstrap I/O error: {}", err),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Io(err)
    }
}

/// Prepares the runtime root: writes a default `config.yaml` when none exists, then
/// loads and validates it.
pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    let runtime_root = config::normalize_root(root)?;
    let created_config = config::ensure_config(&runtime_root)?;
    let validated_config = Config::load_and_validate(&runtime_root)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_root,
        created_config,
    })
}

pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bootstrap_creates_default_config_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = bootstrap_runtime(dir.path()).expect("bootstrap should succeed");

        assert!(result.created_config);
        assert!(dir.path().join("config.yaml").exists());
        assert_eq!(result.validated_config.server.port, config::DEFAULT_PORT);
        assert_eq!(result.validated_config.cms.tag_settle_delay_ms, 300);
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = bootstrap_runtime(dir.path()).expect("bootstrap should succeed");
        assert!(first.created_config);

        let config_path = dir.path().join("config.yaml");
        let before = fs::read_to_string(&config_path).expect("read config");

        let second = bootstrap_runtime(dir.path()).expect("bootstrap should succeed");
        assert!(!second.created_config);
        assert_eq!(before, fs::read_to_string(&config_path).expect("read config"));
    }

    #[test]
    fn bootstrap_creates_missing_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("nested").join("runtime");
        let result = bootstrap_runtime(&root).expect("bootstrap should succeed");
        assert!(result.created_config);
        assert!(root.join("config.yaml").exists());
    }

    #[test]
    fn bootstrap_reports_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("config.yaml"), "server: [").expect("write config");
        let err = bootstrap_runtime(dir.path()).expect_err("broken yaml should fail");
        assert!(matches!(err, BootstrapError::Config(ConfigError::LoadError(_))));
    }
}
