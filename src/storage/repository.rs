//! Load and save with a single fallback step

use log::{info, warn};
use serde::Serialize;

use super::PlanStore;
use crate::plan::{Plan, PlanRecord, UserId};

/// Where a save ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveOutcome {
    /// Written to the primary store
    Primary,
    /// Primary failed; written to the local cache
    Cached,
    /// Both failed; the plan was not persisted
    Dropped,
}

/// Primary store backed by a local cache
pub struct PlanRepository {
    primary: Box<dyn PlanStore>,
    cache: Box<dyn PlanStore>,
}

impl PlanRepository {
    pub fn new(primary: Box<dyn PlanStore>, cache: Box<dyn PlanStore>) -> Self {
        Self { primary, cache }
    }

    /// Load the user's plan.
    ///
    /// Both stores are consulted and the most recently saved record wins, so a
    /// plan cached while the primary was down is not lost once it recovers.
    /// A store that fails counts as holding nothing. Nothing saved anywhere
    /// gives the default plan.
    pub fn load(&self, user_id: &UserId) -> Plan {
        let primary = self.primary.load(user_id).unwrap_or_else(|e| {
            warn!("Primary plan store failed to load {}: {}", user_id, e);
            None
        });
        let cached = self.cache.load(user_id).unwrap_or_else(|e| {
            warn!("Plan cache failed to load {}: {}", user_id, e);
            None
        });

        match (primary, cached) {
            (Some(primary), Some(cached)) if cached.saved_at > primary.saved_at => {
                info!("Cached plan for {} is newer than the stored one ({})", user_id, cached.saved_at);
                cached.to_plan()
            }
            (Some(primary), _) => primary.to_plan(),
            (None, Some(cached)) => {
                info!("Loaded cached plan for {} saved at {}", user_id, cached.saved_at);
                cached.to_plan()
            }
            (None, None) => Plan::default(),
        }
    }

    /// Save a record: primary, then cache, then give up quietly
    pub fn save(&self, record: &PlanRecord) -> SaveOutcome {
        let primary_err = match self.primary.save(record) {
            Ok(()) => {
                info!("Saved plan for {}", record.user_id);
                return SaveOutcome::Primary;
            }
            Err(e) => e,
        };
        warn!("Primary plan store failed to save {}: {}", record.user_id, primary_err);

        match self.cache.save(record) {
            Ok(()) => {
                info!("Cached plan for {} locally", record.user_id);
                SaveOutcome::Cached
            }
            Err(e) => {
                warn!("Dropping plan for {}: cache save failed: {}", record.user_id, e);
                SaveOutcome::Dropped
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::storage::StorageError;
    use std::sync::Mutex;

    /// In-memory store that can be told to fail
    #[derive(Default)]
    pub struct MemoryStore {
        pub records: Mutex<Vec<PlanRecord>>,
        pub fail: bool,
    }

    impl MemoryStore {
        pub fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        pub fn saved(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    impl PlanStore for MemoryStore {
        fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, StorageError> {
            if self.fail {
                return Err(std::io::Error::other("store offline").into());
            }
            let records = self.records.lock().unwrap();
            Ok(records.iter().rev().find(|r| &r.user_id == user_id).cloned())
        }

        fn save(&self, record: &PlanRecord) -> Result<(), StorageError> {
            if self.fail {
                return Err(std::io::Error::other("store offline").into());
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }
}
