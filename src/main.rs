use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use orion::{cli, config, server};

#[derive(Parser)]
#[command(name = "orion", version, about = "OrionAI chat gateway for a local model server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Run one chat turn and print the reply as JSON
    Chat {
        prompt: String,
        /// Model name; defaults to `inference.default_model`
        #[arg(long)]
        model: Option<String>,
        /// Stored conversation whose recent turns are replayed
        #[arg(long)]
        conversation: Option<i64>,
        /// Character id to role-play as
        #[arg(long)]
        character: Option<String>,
    },
    /// Check the database and the model server
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::OrionConfig::load()?;

    // Logs go to stderr so `orion chat` output stays pipeable.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Chat {
            prompt,
            model,
            conversation,
            character,
        } => cli::chat::chat(&config, prompt, model, conversation, character).await?,
        Command::Doctor => cli::doctor::doctor(&config).await?,
    }

    Ok(())
}
