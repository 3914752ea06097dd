// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Options | Configs | List | Add | Remove | Enable | Disable
//!   Move | Select | Toggle | Choose | Deploy | Purge
//! ```

use std::process::ExitCode;

use hdmm_rs::cli::global::GlobalOptions;
use hdmm_rs::cli::{self, Command};
use hdmm_rs::cmd::config::{run_configs_command, run_options_command};
use hdmm_rs::cmd::deploy::{run_deploy_command, run_purge_command};
use hdmm_rs::cmd::mods::{
    run_add_command, run_choose_command, run_list_command, run_move_command, run_remove_command,
    run_select_command, run_set_enabled_command, run_toggle_command,
};
use hdmm_rs::config::Config;
use hdmm_rs::config::loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
use hdmm_rs::logging::init_logging;
use hdmm_rs::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };

    let result = match command {
        Command::Version => {
            handle_version_command();
            Ok(())
        }
        Command::Configs => {
            run_configs_command(&build_config_loader(&cli.global).format_loaded_files());
            Ok(())
        }
        command => match load_config(&cli.global) {
            Ok(config) => run_with_config(command, &config).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_with_config(command: &Command, config: &Config) -> hdmm_rs::error::Result<()> {
    match command {
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::List => run_list_command(config),
        Command::Add(args) => run_add_command(args, config).await,
        Command::Remove(args) => run_remove_command(args, config).await,
        Command::Enable(args) => run_set_enabled_command(args, config, true),
        Command::Disable(args) => run_set_enabled_command(args, config, false),
        Command::Move(args) => run_move_command(args, config),
        Command::Select(args) => run_select_command(args, config),
        Command::Toggle(args) => run_toggle_command(args, config),
        Command::Choose(args) => run_choose_command(args, config),
        Command::Deploy => run_deploy_command(config).await,
        Command::Purge => run_purge_command(config).await,
        Command::Version | Command::Configs => Ok(()),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix("HDMM")
}

fn load_config(global: &GlobalOptions) -> hdmm_rs::error::Result<Config> {
    build_config_loader(global)
        .set_all(&global.to_config_overrides())?
        .build()
        .map_err(|e| {
            eprintln!("Failed to load config: {e}");
            e
        })
}
