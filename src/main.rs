//! Recipe server binary

use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use recipe_store::server::ServiceConfig;
use recipe_store::{run_server, ReadFailurePolicy, RecipeStore, ServerConfig, StoreConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "recipe-server")]
#[command(version)]
#[command(about = "Serve a file-backed recipe collection over HTTP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty recipe collection if none exists
    Init {
        /// Path to the collection file
        #[arg(short, long, default_value = "recipes.json")]
        data_file: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (`PORT` only replaces the default port)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Path to the collection file
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Directory with the browser front-end
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Answer reads with an empty list when the collection is unreadable
    #[arg(long)]
    lenient_reads: bool,
}

impl ServeArgs {
    /// Defaults, then `PORT`, then the config file, then flags.
    ///
    /// `port_from_env` is set when clap filled `port` from `PORT` rather
    /// than from `--port`.
    fn into_server_config(self, port_from_env: bool) -> Result<ServerConfig> {
        let (env_port, flag_port) = if port_from_env {
            (self.port, None)
        } else {
            (None, self.port)
        };

        let mut config = match self.config {
            Some(ref path) => ServiceConfig::load(path)?.to_server_config()?,
            None => {
                let mut defaults = ServerConfig::default();
                if let Some(port) = env_port {
                    defaults.bind_addr.set_port(port);
                }
                defaults
            }
        };

        if let Some(host) = self.host {
            config.bind_addr.set_ip(host);
        }
        if let Some(port) = flag_port {
            config.bind_addr.set_port(port);
        }
        if let Some(data_file) = self.data_file {
            config.store.path = data_file;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = Some(static_dir);
        }
        if self.lenient_reads {
            config.store.read_failure = ReadFailurePolicy::Empty;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let matches = Cli::command().get_matches();
    let port_from_env = matches.value_source("port") == Some(ValueSource::EnvVariable);
    let cli = Cli::from_arg_matches(&matches)?;

    match cli.command {
        Some(Commands::Init { data_file }) => {
            info!("Initializing recipe collection at: {}", data_file.display());
            let store = RecipeStore::open(StoreConfig::new(&data_file))
                .with_context(|| format!("Failed to initialize {}", data_file.display()))?;
            println!(
                "Recipe collection ready at: {} ({} recipes)",
                data_file.display(),
                store.len()?
            );
            Ok(())
        }
        None => run_server(cli.serve.into_server_config(port_from_env)?).await,
    }
}
