//! Service configuration

use crate::storage::{DocumentStore, MemoryStore, OpenStore, SqliteStore, StorageResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where chapter records are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Sqlite(PathBuf),
    Memory,
}

impl Database {
    /// Open the configured store
    pub fn open(&self) -> StorageResult<Arc<dyn DocumentStore>> {
        match self {
            Self::Sqlite(path) => Ok(Arc::new(SqliteStore::open(path)?)),
            Self::Memory => Ok(Arc::new(MemoryStore::new())),
        }
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(path) => write!(f, "sqlite:{}", path.display()),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Which browser origins may call the service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// Echo back whatever origin the request carries
    #[default]
    Mirror,
    /// Only the listed origins
    List(Vec<String>),
}

impl CorsPolicy {
    /// An empty list means mirror any origin
    pub fn from_origins(origins: Vec<String>) -> Self {
        let origins: Vec<String> = origins
            .into_iter()
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            Self::Mirror
        } else {
            Self::List(origins)
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Mirror => true,
            Self::List(origins) => origins.iter().any(|o| o == origin),
        }
    }
}

/// Runtime configuration of the HTTP service
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub database: Database,
    pub cors: CorsPolicy,
    pub log_filter: String,
}

impl Config {
    /// Default database location (`<data dir>/quizstate/quizstate.db`)
    pub fn default_db_path() -> PathBuf {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
        data_dir.join("quizstate").join("quizstate.db")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database: Database::Sqlite(Self::default_db_path()),
            cors: CorsPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
