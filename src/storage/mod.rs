//! Plan persistence: a primary store with a local cache behind it
//!
//! Persistence never affects a projection. Loads degrade to a cached or empty
//! plan and saves degrade to the cache, then to nothing.

mod csv_cache;
mod json_store;
mod repository;

pub use csv_cache::CsvPlanCache;
pub use json_store::JsonDirectoryStore;
pub use repository::{PlanRepository, SaveOutcome};

#[cfg(test)]
pub(crate) use repository::testing;

use thiserror::Error;

use crate::plan::{PlanRecord, UserId};

/// Error types for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored plan is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan cache is unreadable: {0}")]
    Csv(#[from] csv::Error),

    #[error("user id {0:?} cannot be used as a storage key")]
    InvalidUserId(String),
}

/// Somewhere plans can be saved to and loaded from
pub trait PlanStore: Send + Sync {
    /// Most recent record for the user, or `None` if nothing was saved
    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, StorageError>;

    /// Persist a record
    fn save(&self, record: &PlanRecord) -> Result<(), StorageError>;
}
