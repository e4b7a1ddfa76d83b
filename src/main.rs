//! tinyagent CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tinyagent::agent::Conversation;
use tinyagent::cli::{preflight, repl, Cli, History, Output};
use tinyagent::config::Settings;
use tinyagent::gateway::OpenAIGateway;
use tinyagent::tools::ToolBox;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };
    if let Some(model) = &cli.model {
        settings.model.name = model.clone();
    }
    if let Some(rounds) = cli.max_tool_rounds {
        settings.model.max_tool_rounds = rounds;
    }

    std::fs::create_dir_all(settings.data_dir())?;
    init_logging(&settings, cli.verbose)?;

    if let Err(e) = preflight::check_api_key() {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    for program in preflight::missing_programs(&settings) {
        Output::warning(&format!("{} not found; tool calls that need it will fail", program));
    }

    let model = Arc::new(OpenAIGateway::new(&settings.model)?);
    let tools = Arc::new(ToolBox::from_settings(&settings.tools)?);
    let mut conversation = Conversation::new(model, tools, &settings.model.system_prompt)
        .with_max_tool_rounds(settings.model.max_tool_rounds);
    let history = History::new(settings.history_file());

    tracing::info!(model = %settings.model.name, "session started");

    repl::run(&mut conversation, Some(&history), std::io::stdin().lock()).await?;

    Ok(())
}

/// Log everything to the log file, and warnings (or more with -v) to stderr.
fn init_logging(settings: &Settings, verbose: u8) -> Result<()> {
    let console_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let log_path = settings.log_file();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    let file_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("tinyagent={}", settings.general.log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .with_filter(EnvFilter::new(file_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(format!("tinyagent={}", console_level))),
        )
        .init();

    Ok(())
}
