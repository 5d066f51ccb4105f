use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use hashed_urls::logging::init_tracing;
use hashed_urls::startup::init_app;
use hashed_urls_config::{Metadata, PluginConfig, ServerConfig};
use hashed_urls_core::HashRegistry;
use hashed_urls_db::Catalog;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "hashed-urls")]
#[command(about = "Serve immutable SQLite databases under content-hashed URLs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    /// Mutable database files
    files: Vec<PathBuf>,

    /// Immutable database files, served under hashed URLs
    #[arg(short = 'i', long = "immutable")]
    immutables: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        databases: DatabaseArgs,

        /// Metadata JSON file with a `plugins` section
        #[arg(short = 'm', long)]
        metadata: Option<PathBuf>,

        /// Bind address (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides PORT)
        #[arg(short = 'p', long)]
        port: Option<u16>,

        /// Cache max-age in seconds for hashed responses
        #[arg(long)]
        max_age: Option<u64>,

        /// Cache max-age in seconds for redirects, 0 to omit the header
        #[arg(long)]
        redirect_max_age: Option<u64>,
    },
    /// Print the hashed name every database would be served under
    Inspect {
        #[command(flatten)]
        databases: DatabaseArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_tracing(log_dir.as_deref());

    let result = match cli.command {
        Commands::Serve {
            databases,
            metadata,
            host,
            port,
            max_age,
            redirect_max_age,
        } => {
            let plugin_config =
                load_plugin_config(metadata)?.with_cli_overrides(max_age, redirect_max_age);

            let mut server_config = ServerConfig::from_env();
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }

            serve(databases, plugin_config, server_config).await
        }
        Commands::Inspect { databases } => inspect(databases).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "Exiting");
    }
    result
}

fn load_plugin_config(metadata: Option<PathBuf>) -> anyhow::Result<PluginConfig> {
    let metadata = match metadata {
        Some(path) => Metadata::from_path(&path)
            .with_context(|| format!("loading metadata from {}", path.display()))?,
        None => Metadata::default(),
    };
    Ok(PluginConfig::from_metadata(&metadata)?.with_env_overrides())
}

async fn serve(
    databases: DatabaseArgs,
    plugin_config: PluginConfig,
    server_config: ServerConfig,
) -> anyhow::Result<()> {
    // Startup must finish before the listener exists.
    let app = init_app(&databases.files, &databases.immutables, plugin_config).await?;

    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn inspect(databases: DatabaseArgs) -> anyhow::Result<()> {
    let catalog = Catalog::open(&databases.files, &databases.immutables).await?;
    let registry = HashRegistry::build(&catalog.datasets())?;

    for db in catalog.iter() {
        let kind = if db.is_mutable() { "mutable" } else { "immutable" };
        println!("{}\t{}\t{}", registry.public_name(&db.name), kind, db.path.display());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
