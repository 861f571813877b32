//! Maintenance commands for the local document collections.
//!
//! Each collection is a JSON array stored as `<data-dir>/<collection>.json`.
//! The server reads `routes`; `stations`, `stops` and `fares` hold the
//! reference data seeded alongside it.
//!
//! ```text
//! route-admin seed data/seed_routes.json
//! route-admin --collection stations seed data/seed_stations.json
//! route-admin export backups/routes.json
//! route-admin --collection stops delete
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use route_server::store::{JsonFileStore, StoreError};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "route-admin", about = "Maintain the route collection files")]
struct Cli {
    /// Directory holding the collection files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Collection to operate on
    #[arg(long, default_value = "routes")]
    collection: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert or replace documents from a JSON array
    Seed { file: PathBuf },
    /// Remove every document from the collection
    Delete,
    /// Write a copy of the collection to a file
    Export { out: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_server=info,route_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::collection(&cli.data_dir, &cli.collection)?;

    match cli.command {
        Command::Seed { file } => {
            let documents = read_seed(&file).await?;
            let ids = store.upsert(documents).await?;
            info!(
                count = ids.len(),
                collection = %cli.collection,
                path = %store.path().display(),
                "seeded collection"
            );
        }
        Command::Delete => {
            let removed = store.delete_all().await?;
            if removed == 0 {
                info!(collection = %cli.collection, "no documents to delete");
            } else {
                info!(collection = %cli.collection, removed, "all documents deleted");
            }
        }
        Command::Export { out } => {
            let count = store.export_to(&out).await?;
            info!(collection = %cli.collection, count, out = %out.display(), "collection exported");
        }
    }

    Ok(())
}

/// Read a seed file: a JSON array of documents.
async fn read_seed(path: &Path) -> Result<Vec<Value>, StoreError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    match serde_json::from_str(&contents) {
        Ok(Value::Array(documents)) => Ok(documents),
        Ok(_) => Err(StoreError::Json {
            message: format!("{} must contain a JSON array", path.display()),
        }),
        Err(e) => Err(StoreError::Json {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_routes_collection() {
        let cli = Cli::try_parse_from(["route-admin", "delete"]).unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.collection, "routes");
        assert!(matches!(cli.command, Command::Delete));
    }

    #[test]
    fn collection_flag_selects_file() {
        let cli = Cli::try_parse_from([
            "route-admin",
            "--data-dir",
            "/srv/transit",
            "--collection",
            "stations",
            "seed",
            "stations.json",
        ])
        .unwrap();

        let store = JsonFileStore::collection(&cli.data_dir, &cli.collection).unwrap();
        assert_eq!(store.path(), Path::new("/srv/transit/stations.json"));
        assert!(matches!(cli.command, Command::Seed { ref file } if file == Path::new("stations.json")));
    }
}
