use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use weather_herald::herald::condition::{evaluate_document, Document};
use weather_herald::herald::config::Settings;
use weather_herald::herald::server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the task management HTTP API
    Serve {
        /// Port to listen on (overrides HERALD_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Optional YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Evaluate a condition document and print the result
    Check {
        /// Condition as JSON, e.g. '{"gt": [5, 3]}'
        #[arg(short, long)]
        condition: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Serve { port, config } => {
            let mut settings =
                Settings::load(config.as_deref()).context("Failed to load configuration")?;
            if let Some(port) = port {
                settings.port = port;
            }
            server::serve(settings).await?;
        }
        Commands::Check { condition } => {
            let document: Document =
                serde_json::from_str(&condition).context("Condition is not a JSON object")?;
            match evaluate_document(&document) {
                Ok(result) => println!("{}", result),
                Err(e) => anyhow::bail!("{}: {}", e.kind(), e),
            }
        }
    }

    Ok(())
}
