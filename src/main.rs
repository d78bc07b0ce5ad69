pub mod config;
pub mod data;
pub mod figure;
pub mod plotly;
pub mod server;
pub mod types;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the figure and serve the map as a web app
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Build the figure and write it to a JSON file
    Export {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,

        #[arg(short, long, value_name = "FILE", default_value = "figure.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            println!("Serving map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            let dataset = data::load_dataset(&app_config)?;
            let fig = figure::build_figure(&app_config, &dataset)?;

            server::start_server(app_config, fig).await?;
        }
        Commands::Export { config, out } => {
            println!("Exporting figure with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            let dataset = data::load_dataset(&app_config)?;
            let fig = figure::build_figure(&app_config, &dataset)?;

            let json = serde_json::to_string_pretty(&fig)?;
            std::fs::write(out, json)
                .with_context(|| format!("Failed to write figure to {:?}", out))?;
            println!("Wrote figure to {:?}", out);
        }
    }

    Ok(())
}
