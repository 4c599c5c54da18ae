// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::LoggingConfig;
use env_logger::Logger;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Demotes chatty dependency output by one level so `info` stays readable.
const DEFAULT_DEMOTIONS: [(&str, Level, Level); 3] = [
    ("tokio_postgres", Level::Info, Level::Debug),
    ("reqwest", Level::Debug, Level::Trace),
    ("hyper_util", Level::Debug, Level::Trace),
];

struct DemotingLogger {
    inner: Logger,
    rules: Vec<(String, Level, Level)>,
}

impl DemotingLogger {
    fn level_for(&self, target: &str, original: Level) -> Level {
        self.rules
            .iter()
            .find(|(prefix, from, _)| target.starts_with(prefix.as_str()) && *from == original)
            .map(|(_, _, to)| *to)
            .unwrap_or(original)
    }
}

impl Log for DemotingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let demoted = Metadata::builder()
            .level(self.level_for(metadata.target(), metadata.level()))
            .target(metadata.target())
            .build();
        self.inner.enabled(&demoted)
    }

    fn log(&self, record: &Record) {
        let level = self.level_for(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the process logger. `RUST_LOG` directives refine the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SetLoggerError> {
    let logger = env_logger::Builder::new()
        .filter_level(parse_level(&config.level))
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    let max_level = logger.filter();
    let rules = DEFAULT_DEMOTIONS
        .iter()
        .map(|(target, from, to)| (target.to_string(), *from, *to))
        .collect();
    log::set_boxed_logger(Box::new(DemotingLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_is_case_insensitive() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level(" warn "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn parse_level_defaults_to_info() {
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn demotion_applies_to_matching_target_and_level() {
        let logger = DemotingLogger {
            inner: env_logger::Builder::new().build(),
            rules: vec![("tokio_postgres".to_string(), Level::Info, Level::Debug)],
        };
        assert_eq!(
            logger.level_for("tokio_postgres::connection", Level::Info),
            Level::Debug
        );
        assert_eq!(
            logger.level_for("tokio_postgres::connection", Level::Warn),
            Level::Warn
        );
        assert_eq!(logger.level_for("toolhub::api", Level::Info), Level::Info);
    }
}
