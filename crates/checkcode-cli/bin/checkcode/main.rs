mod cli;
mod commands;

use crate::cli::{GuardBackendArg, SchemeArg, CLI};
use anyhow::Context;
use checkcode_core::UniquenessGuard;
use checkcode_generator::{
    LuhnSettings, LuhnVariantChecksumGenerator, ModularChecksumGenerator, ModularSettings,
};
use checkcode_storage::{InMemoryGuard, RedisGuard};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(
        scheme = %config.scheme,
        alphabet = %config.alphabet,
        code_length = config.code_length(),
        guard = %config.guard,
        "starting checkcode"
    );

    let all_valid = match config.guard {
        GuardBackendArg::InMemory => run(&config, Arc::new(InMemoryGuard::new())).await?,
        GuardBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when the guard backend is redis")?;
            let guard =
                RedisGuard::connect_with_prefix(redis_url, config.guard_namespace()).await?;
            info!(key_prefix = guard.key_prefix(), "connected to Redis guard");
            run(&config, Arc::new(guard)).await?
        }
    };

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run<G: UniquenessGuard>(config: &CLI, guard: Arc<G>) -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout().lock();

    match config.scheme {
        SchemeArg::Modular => {
            let settings = ModularSettings::builder()
                .alphabet(config.alphabet.clone())
                .code_length(config.code_length())
                .build();
            let scheme = ModularChecksumGenerator::new(settings)?;
            commands::execute(
                &config.command,
                "modular",
                &scheme,
                guard.as_ref(),
                config.max_attempts,
                &mut stdout,
            )
            .await
        }
        SchemeArg::Luhn => {
            let prefix = config
                .prefix
                .context("a prefix is required for the luhn scheme")?;
            let settings = LuhnSettings::builder()
                .alphabet(config.alphabet.clone())
                .code_length(config.code_length())
                .prefix(prefix)
                .max_attempts(config.max_attempts)
                .build();
            let scheme = LuhnVariantChecksumGenerator::new(settings, Arc::clone(&guard))?;
            commands::execute(
                &config.command,
                "luhn",
                &scheme,
                scheme.guard(),
                scheme.max_attempts(),
                &mut stdout,
            )
            .await
        }
    }
}
