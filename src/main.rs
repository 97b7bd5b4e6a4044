//! mailquill - reply drafting for webmail pages.
//!
//! Main entry point for the mailquill CLI.

mod channel;
mod cli;
mod compose;
mod pages;
mod register;

use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mailquill_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use mailquill_protocols::InsertionStatus;

use crate::cli::{Cli, Commands};
use crate::compose::ReplyController;

/// Initialize tracing on stderr, plus a daily-rotated file when a log
/// directory is configured. Stdout carries only command output.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match &logging.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("mailquill")
                .filename_suffix("log")
                .max_log_files(14)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes on drop, so it lives for the whole process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(file_layer)
        .init();

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !result.is_valid() {
        for err in &result.errors {
            error!(path = %err.path, "{}", err.message);
        }
        return Err(format!("invalid configuration ({} errors)", result.errors.len()).into());
    }
    Ok(())
}

/// Cancelled on Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            child.cancel();
        }
    });
    token
}

fn print_status(status: &InsertionStatus) -> Result<ExitCode, Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(status)?);
    Ok(if status.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match ConfigLoader::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    init_tracing(&config.logging)?;
    validate_config(&config)?;

    let page_args = cli.command.page().clone();
    let page = pages::load_page(&page_args.page, page_args.url.as_deref())?;
    let agent = register::build_agent(page.clone(), &config);
    let cancel = interrupt_token();

    let code = match cli.command {
        Commands::Serve { .. } => {
            let input = BufReader::new(tokio::io::stdin());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                result = channel::serve(&agent, input, tokio::io::stdout()) => {
                    result?;
                }
            }
            ExitCode::SUCCESS
        }
        Commands::Insert { text, .. } => print_status(&agent.insert_text(&text))?,
        Commands::OpenAndInsert { text, .. } => {
            print_status(&agent.open_and_insert_with_cancel(&text, &cancel).await)?
        }
        Commands::ReadThread { .. } => {
            let text = agent.incoming_thread_text();
            println!("{text}");
            if text.is_empty() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        Commands::Reply { mode, instruction, .. } => {
            let generator = mailquill_provider_openai::generator_from_config(&config.generation);
            let controller = ReplyController::new(agent, generator);
            match controller.reply(mode, instruction.as_deref(), &cancel).await {
                Ok(status) => print_status(&status)?,
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
    };

    if let Some(output) = &page_args.output {
        pages::write_body(&page, output)?;
        info!(path = %output.display(), "Body written");
    }

    Ok(code)
}
