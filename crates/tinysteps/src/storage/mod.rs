//! Persistence seams shared by every feature module.

pub mod memory;

pub use memory::MemoryStore;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Failure loading or writing a store snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot at {path} is not valid: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
