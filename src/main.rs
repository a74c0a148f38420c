use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flyspray::config::Config;
use flyspray::server::{AppState, create_router};
use flyspray::store::{SqliteStore, Store};

const DEFAULT_CONFIG_FILE: &str = "flyspray.toml";

#[derive(Parser)]
#[command(name = "flyspray")]
#[command(about = "A bug tracking server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Configuration file (TOML)
        #[arg(long, short, env = "FLYSPRAY_CONFIG")]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Create or upgrade the database schema, then exit
    Migrate {
        /// Configuration file (TOML)
        #[arg(long, short, env = "FLYSPRAY_CONFIG")]
        config: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Print the version
    Version,
}

/// An explicitly named config file must exist; the default one is optional.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    Ok(config.with_env())
}

fn open_store(db_path: &Path) -> anyhow::Result<SqliteStore> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let store = SqliteStore::new(db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    store.migrate()?;
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("flyspray=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            db,
        } => {
            let mut config = load_config(config)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(db) = db {
                config.database.path = db;
            }
            config.validate()?;

            let store = open_store(&config.database.path)?;
            info!("Using database {}", config.database.path.display());

            let state = Arc::new(AppState::new(Arc::new(store), &config));
            let app = create_router(state);
            let addr = config.server.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Migrate { config, db } => {
            let mut config = load_config(config)?;
            if let Some(db) = db {
                config.database.path = db;
            }
            config.validate_database()?;

            let store = open_store(&config.database.path)?;
            println!(
                "Database {} is at schema version {}",
                config.database.path.display(),
                store.schema_version()?
            );
        }
        Commands::Version => {
            println!("flyspray {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
