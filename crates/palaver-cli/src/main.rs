//! palaver CLI: terminal chat client for an AI backend

use clap::{Parser, Subcommand};
use palaver_engine::{
    clear_history, load_history, BackendConfig, ChatBackend, Config, ConversationController,
    FileStore, Message, DEFAULT_DATA_DIR,
};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Chat with an AI backend from the terminal
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding config, history and logs
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Chat command line to use instead of the configured one, split with
    /// shell quoting (e.g. 'sh -c "llm {message}"'); use {message} to pass
    /// the text as an argument
    #[arg(long, global = true)]
    command: Option<String>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    subcommand: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Send one message and print the exchange
    Send {
        /// Message text
        text: String,

        /// Seconds to wait for the backend to become ready
        #[arg(long, default_value = "5")]
        wait: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the stored conversation
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the stored conversation
    Clear,

    /// Check that the chat backend is reachable
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init,
}

const LOG_ENV: &str = "PALAVER_LOG";
const LOG_FILE: &str = "palaver.log";

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = cli.subcommand.unwrap_or(Commands::Tui);
    init_logging(&cli.data_dir, cli.debug, command == Commands::Tui)?;

    let data_dir = cli.data_dir.as_path();
    let load_config = || -> Result<Config, Box<dyn Error>> {
        let config = resolve_config(data_dir, cli.command.as_deref())?;
        debug!(data_dir = %data_dir.display(), backend = %config.backend.name, "Configuration loaded");
        Ok(config)
    };

    match command {
        Commands::Tui => {
            let controller = build_controller(data_dir, &load_config()?)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(palaver_tui::run_tui(controller))
        }
        Commands::Send { text, wait, json } => {
            let controller = build_controller(data_dir, &load_config()?)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cmd_send(controller, text, Duration::from_secs(wait), json))
        }
        Commands::History { json } => cmd_history(data_dir, &load_config()?, json),
        Commands::Clear => cmd_clear(data_dir, &load_config()?),
        Commands::Doctor { json } => cmd_doctor(&load_config()?, json),
        // Writes the config, so it must not require a valid one
        Commands::Init => cmd_init(data_dir),
    }
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so its logs go to a file in the data dir.
fn init_logging(data_dir: &Path, debug: bool, tui: bool) -> Result<(), Box<dyn Error>> {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tui {
        fs::create_dir_all(data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

/// Load the config file and apply command-line overrides.
fn resolve_config(data_dir: &Path, command: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::load_or_default(&Config::path_in(data_dir))?;
    if let Some(command) = command {
        let argv = shell_words::split(command)
            .map_err(|e| format!("--command could not be parsed: {e}"))?;
        if argv.is_empty() {
            return Err("--command must not be empty".into());
        }
        config.backend = BackendConfig::from_argv(argv);
    }
    Ok(config)
}

fn build_controller(
    data_dir: &Path,
    config: &Config,
) -> Result<ConversationController, Box<dyn Error>> {
    let store = FileStore::new(data_dir)?;
    let backend = Arc::new(config.backend.build());
    Ok(ConversationController::from_config(
        config,
        Box::new(store),
        backend,
    ))
}

/// One line per message: `[14:03] You: hello`.
fn format_message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.timestamp(),
        message.author_label(),
        message.content()
    )
}

fn print_messages(messages: &[Message], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
    } else {
        for message in messages {
            println!("{}", format_message(message));
        }
    }
    Ok(())
}

async fn cmd_send(
    mut controller: ConversationController,
    text: String,
    wait: Duration,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    controller.initialize();
    let ready = controller.wait_until_ready(wait).await;
    info!(ready, "Readiness settled");

    let before = controller.messages().len();
    controller.set_draft_input(text);
    controller.send_message().await;
    controller.shutdown();

    print_messages(&controller.messages()[before..], json)?;

    if ready {
        Ok(())
    } else {
        let backend = controller.backend();
        Err(format!(
            "backend '{}' was not ready after {}s",
            backend.name(),
            wait.as_secs()
        )
        .into())
    }
}

fn cmd_history(data_dir: &Path, config: &Config, json: bool) -> Result<(), Box<dyn Error>> {
    let store = FileStore::new(data_dir)?;
    let conversation = load_history(&store, &config.storage_key);

    if !json && conversation.is_empty() {
        println!("No messages");
        return Ok(());
    }
    print_messages(conversation.messages(), json)
}

fn cmd_clear(data_dir: &Path, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut store = FileStore::new(data_dir)?;
    clear_history(&mut store, &config.storage_key)?;
    println!("Conversation cleared");
    Ok(())
}

fn cmd_doctor(config: &Config, json: bool) -> Result<(), Box<dyn Error>> {
    let backend = config.backend.build();
    let path = backend.resolve();
    let ready = backend.is_ready();

    if json {
        let report = serde_json::json!({
            "backend": backend.name(),
            "command": config.backend.command_argv,
            "path": path.as_ref().map(|p| p.display().to_string()),
            "ready": ready,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Backend: {}", backend.name());
    println!("  Command: {}", config.backend.command_argv.join(" "));
    match &path {
        Some(path) => println!("  Path: {}", path.display()),
        None => println!("  Path: not found on PATH"),
    }
    println!("  Status: {}", if ready { "ready" } else { "not ready" });
    Ok(())
}

fn cmd_init(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let config_path = Config::path_in(data_dir);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    Config::default().save(&config_path)?;
    println!("Created {}", config_path.display());
    Ok(())
}
