// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use toolhub::app_state::AppState;
use toolhub::auth::SessionGateFactory;
use toolhub::bootstrap::{self, BootstrapResult};
use toolhub::config::ValidatedConfig;
use toolhub::logging;

const HELP_TEXT: &str = "\
toolhub - tools directory and blog backend

Usage: toolhub [-C <root>]

Options:
  -C <root>   Runtime directory holding config.yaml (default: .)
  -h, --help  Show this help
";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);

    logging::init_logging(&validated_config.logging).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &bootstrap.runtime_root, bootstrap.created_config);

    let app_state = match AppState::connect(validated_config.clone()).await {
        Ok(state) => web::Data::new(state),
        Err(error) => {
            eprintln!("❌ Failed to initialize application state: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ App state initialized for {}", validated_config.app.name);

    let workers = validated_config.server.workers;
    let (host, port) = validated_config.bind_address();
    let config_for_app = validated_config.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(config_for_app.clone()))
            .app_data(app_state.clone())
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .wrap(SessionGateFactory)
            .configure(toolhub::configure)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_root: &std::path::Path, created_config: bool) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Environment: {:?}", config.app.environment);
    info!("Workers: {}", config.server.workers);
    info!("Listening on {}:{}", config.server.host, config.server.port);
    info!("Auth provider: {}", config.auth.base_url);
    info!("CMS endpoint: {}", config.cms.endpoint);
    if config.cms.mutation_token.is_none() {
        info!("CMS mutation token not set; writing posts will fail");
    }
    info!("Runtime root: {}", runtime_root.display());
    if created_config {
        info!("Wrote default config.yaml; review it before going to production");
    }
}

enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument: {}", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs {
        runtime_root,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
