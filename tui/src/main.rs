//! Dream Companion Entry Point
//!
//! Launches the terminal studio: design a companion, generate its portrait,
//! then chat with it.
//!
//! Usage:
//!   companion [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>        Config file (default: ~/.config/dream-companion/companion.toml)
//!   --chat-model <MODEL>       Conversational model override
//!   --image-model <MODEL>      Image model override
//!   --log-file <PATH>          Write logs to this file (the screen is never logged to)
//!   -l, --log-level <LEVEL>    Log level when RUST_LOG is unset (default: info)

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use companion_core::{
    default_config_path, load_config_from_path, ConfigOverrides, GeminiBackend, Studio,
};
use companion_tui::App;

/// Dream Companion - design a companion and chat with it
#[derive(Parser, Debug)]
#[command(name = "companion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long, env = "COMPANION_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Conversational model
    #[arg(long, value_name = "MODEL")]
    chat_model: Option<String>,

    /// Image generation model
    #[arg(long, value_name = "MODEL")]
    image_model: Option<String>,

    /// Log file; without one nothing is logged
    #[arg(long, env = "COMPANION_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs never go to the terminal the UI draws on
    let file_layer = match &cli.log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(File::create(path)?)),
        ),
        None => None,
    };
    let level = &cli.log_level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("companion_tui={level},companion_core={level}"))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    // Resolve configuration before touching the terminal
    let mut config = load_config_from_path(cli.config.clone().or_else(default_config_path))?;
    let mut overrides = ConfigOverrides::new();
    if let Some(model) = cli.chat_model {
        overrides = overrides.with_chat_model(model);
    }
    if let Some(model) = cli.image_model {
        overrides = overrides.with_image_model(model);
    }
    overrides.apply(&mut config);
    config.validate()?;

    if config.api_key.is_none() {
        warn!("No API key configured; set GEMINI_API_KEY to enable generation and chat");
    }
    info!(
        chat_model = %config.chat_model,
        image_model = %config.image_model,
        source = %config.source(),
        "Configuration loaded"
    );

    let backend = GeminiBackend::from_config(&config)?;
    let studio =
        Studio::new(Arc::new(backend)).with_avatar_aspect_ratio(config.avatar_aspect_ratio);

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: companion requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or SSH ran without -t.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut app = App::new(studio);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
