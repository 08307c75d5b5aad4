use anyhow::Result;
use clap::{Parser, Subcommand};

use bolsa::app::App;
use bolsa::config::Config;
use bolsa::logging;
use bolsa::wizard::forms::SubmitIntent;

#[derive(Parser)]
#[command(name = "bolsa")]
#[command(about = "Terminal client for the Bolsa de Empleo Inclusiva job board")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the job-posting wizard (the default)
    Post {
        /// Edit an existing posting instead of creating one
        #[arg(short, long)]
        edit: bool,
    },

    /// Open the account registration wizard
    Register,

    /// Show the project contributors
    Contributors,

    /// Write the effective configuration to the user config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // init is a plain CLI command; handle it before any TUI setup
    if matches!(cli.command, Some(Commands::Init)) {
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let logging_handle = logging::init_logging(&config, cli.debug)?;

    let mut app = match cli.command {
        Some(Commands::Post { edit }) => {
            let intent = if edit {
                SubmitIntent::Update
            } else {
                SubmitIntent::Publish
            };
            App::job_posting(config, intent)?
        }
        Some(Commands::Register) => App::registration(config)?,
        Some(Commands::Contributors) => App::contributors(config)?,
        // Init returned above
        Some(Commands::Init) | None => App::job_posting(config, SubmitIntent::Publish)?,
    };

    let result = app.run().await;

    // Point at the session log on exit if anything was written
    if let Some(log_path) = logging_handle.log_file_path {
        if log_path.exists() {
            if let Ok(metadata) = log_path.metadata() {
                if metadata.len() > 0 {
                    eprintln!("Session log: {}", log_path.display());
                }
            }
        }
    }

    result
}
