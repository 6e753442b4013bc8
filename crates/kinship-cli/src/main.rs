use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use kinship_core::config::KinshipConfig;
use kinship_core::query::KinshipEngine;
use kinship_core::storage::StorageBackend;
use kinship_core::storage::duckdb::DuckDbStorage;

#[derive(Parser)]
#[command(name = "kinship", about = "Family-tree record service over REST")]
struct Cli {
    /// Path to the database file
    #[arg(long, default_value = "kinship.db", env = "KINSHIP_DB_PATH")]
    db_path: PathBuf,

    /// PostgreSQL connection URL (enables PostgreSQL backend instead of DuckDB)
    #[arg(long, env = "KINSHIP_POSTGRES_URL")]
    postgres_url: Option<String>,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0", env = "KINSHIP_HOST")]
    host: String,

    /// HTTP port
    #[arg(long, default_value = "8001", env = "KINSHIP_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kinship=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = KinshipConfig {
        db_path: cli.db_path.clone(),
        ..KinshipConfig::default()
    };

    let storage: Arc<dyn StorageBackend> = if let Some(_pg_url) = &cli.postgres_url {
        #[cfg(feature = "postgres")]
        {
            let pg_storage = kinship_postgres::PgStorage::connect(_pg_url).await?;
            tracing::info!("Using PostgreSQL backend");
            Arc::new(pg_storage)
        }
        #[cfg(not(feature = "postgres"))]
        {
            return Err("PostgreSQL support not enabled. Rebuild with --features postgres".into());
        }
    } else {
        let storage = DuckDbStorage::open(&config.db_path)?;
        tracing::info!("Database opened at {:?}", config.db_path);
        Arc::new(storage)
    };

    let engine = Arc::new(KinshipEngine::new(storage).with_config(&config));
    let app = kinship_rest::router(engine);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("REST API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Kinship shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
