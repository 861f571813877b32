//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `ROUTE_SERVER_ADDR` | `127.0.0.1:3000` |
//! | `ROUTE_STORE` | `file` (or `firestore`) |
//! | `ROUTE_STORE_PATH` | `data/routes.json` |
//! | `FIRESTORE_PROJECT` | required for `firestore` |
//! | `FIRESTORE_TOKEN` | none |
//! | `FIRESTORE_BASE_URL` | public Firestore endpoint |
//! | `ROUTE_COLLECTION` | `routes` |
//! | `DEFAULT_FARE` | `3.5` |
//! | `ROUTE_CACHE_TTL_SECS` | `30` (`0` disables caching) |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::matcher::MatcherConfig;
use crate::store::FirestoreConfig;

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default path of the route collection file.
const DEFAULT_STORE_PATH: &str = "data/routes.json";

/// Default snapshot cache TTL in seconds.
const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to something unusable
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },

    /// A variable required by the chosen store was not set
    #[error("{0} must be set when ROUTE_STORE=firestore")]
    Missing(&'static str),
}

/// Which route store to open.
#[derive(Debug, Clone)]
pub enum StoreKind {
    /// JSON collection file on local disk
    File { path: PathBuf },
    /// Firestore collection over REST
    Firestore(FirestoreConfig),
}

/// Configuration for the route server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,

    /// Route store to read from
    pub store: StoreKind,

    /// Fare used for routes without one
    pub default_fare: f64,

    /// How long to cache the route snapshot; zero disables the cache
    pub cache_ttl: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to read variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr_value = var("ROUTE_SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "ROUTE_SERVER_ADDR",
                message: format!("{addr_value}: {e}"),
            })?;

        let store = match var("ROUTE_STORE").as_deref().unwrap_or("file") {
            "file" => StoreKind::File {
                path: var("ROUTE_STORE_PATH")
                    .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string())
                    .into(),
            },
            "firestore" => {
                let project =
                    var("FIRESTORE_PROJECT").ok_or(ConfigError::Missing("FIRESTORE_PROJECT"))?;
                let mut config = FirestoreConfig::new(project);
                if let Some(collection) = var("ROUTE_COLLECTION") {
                    config = config.with_collection(collection);
                }
                if let Some(token) = var("FIRESTORE_TOKEN") {
                    config = config.with_token(token);
                }
                if let Some(base_url) = var("FIRESTORE_BASE_URL") {
                    config = config.with_base_url(base_url);
                }
                StoreKind::Firestore(config)
            }
            other => {
                return Err(ConfigError::Invalid {
                    name: "ROUTE_STORE",
                    message: format!("{other} (expected file or firestore)"),
                });
            }
        };

        let default_fare = match var("DEFAULT_FARE") {
            Some(value) => match value.parse::<f64>() {
                Ok(fare) if fare.is_finite() && fare >= 0.0 => fare,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DEFAULT_FARE",
                        message: format!("{value} (expected a non-negative number)"),
                    });
                }
            },
            None => MatcherConfig::default().default_fare,
        };

        let cache_ttl_secs = match var("ROUTE_CACHE_TTL_SECS") {
            Some(value) => value.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "ROUTE_CACHE_TTL_SECS",
                message: format!("{value}: {e}"),
            })?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            addr,
            store,
            default_fare,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    /// Matcher configuration derived from this config.
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::default().with_default_fare(self.default_fare)
    }
}
