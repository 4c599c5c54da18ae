// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, AuthConfig, CmsConfig, DatabaseConfig, Environment, LoggingConfig, ServerConfig,
    ValidatedConfig,
};

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                app: AppConfig {
                    name: "Toolhub Test".to_string(),
                    description: "Test instance".to_string(),
                    environment: Environment::Development,
                },
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                auth: AuthConfig {
                    base_url: "http://127.0.0.1:3000".to_string(),
                    timeout_seconds: 5,
                },
                cms: CmsConfig {
                    endpoint: "http://127.0.0.1:4000/graphql".to_string(),
                    mutation_token: Some("test-token".to_string()),
                    tag_settle_delay_ms: 0,
                    timeout_seconds: 5,
                },
                database: DatabaseConfig::default(),
            },
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.config.app.environment = environment;
        self
    }

    pub fn with_settle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.cms.tag_settle_delay_ms = delay_ms;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
