use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod logging;

use context::AppContext;
use sherpa_infrastructure::SherpaPaths;

#[derive(Parser)]
#[command(name = "sherpa")]
#[command(about = "Sherpa - enquiries and the AI Sherpa for the Kedarkantha winter trek", long_about = None)]
struct Cli {
    /// Use this directory for config.toml, secret.json, logs and speech output
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write template secret.json and config.toml files
    Init,
    /// Submit one trek enquiry
    Enquire {
        #[arg(long)]
        name: String,
        /// 10-digit mobile number starting with 6-9
        #[arg(long)]
        phone: String,
        /// Number of travelers (1-50)
        #[arg(long)]
        travelers: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Chat with the AI Sherpa
    Chat {
        /// Start in deep reasoning mode
        #[arg(long)]
        deep: bool,
    },
    /// Speak a line of text aloud (or into a WAV file without an audio device)
    Speak { text: String },
    /// Ask for a hint about the Mystery Day
    Clue,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SherpaPaths::new(cli.config_dir.as_deref());
    let logs_dir = paths.logs_dir().ok();

    // init must work even when the existing config.toml does not parse
    if matches!(cli.command, Commands::Init) {
        let _log_guard = logging::init(None, logs_dir);
        return commands::init::run(&paths);
    }

    let ctx = match AppContext::load(paths) {
        Ok(ctx) => ctx,
        Err(err) => {
            let _log_guard = logging::init(None, logs_dir);
            tracing::error!("[Startup] {:#}", err);
            return Err(err);
        }
    };
    let _log_guard = logging::init(ctx.config.log_level.as_deref(), logs_dir);

    match cli.command {
        Commands::Init => commands::init::run(&ctx.paths)?,
        Commands::Enquire {
            name,
            phone,
            travelers,
            message,
        } => {
            let input = commands::enquire::EnquiryInput {
                name,
                phone,
                travelers: travelers.unwrap_or_default(),
                message: message.unwrap_or_default(),
            };
            commands::enquire::run(&ctx, input).await?
        }
        Commands::Chat { deep } => commands::chat::run(&ctx, deep).await?,
        Commands::Speak { text } => commands::speak::run(&ctx, &text).await?,
        Commands::Clue => commands::clue::run(&ctx).await?,
    }

    Ok(())
}
