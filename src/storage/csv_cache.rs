//! Local plan cache: an append-only CSV of flattened plan records

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use csv::{Reader, WriterBuilder};
use log::warn;

use super::{PlanStore, StorageError};
use crate::plan::{PlanRecord, UserId};

/// Appends every saved record; the newest record for a user wins on load
#[derive(Debug, Clone)]
pub struct CsvPlanCache {
    path: PathBuf,
}

impl CsvPlanCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All readable records in file order; malformed rows are skipped
    pub fn records(&self) -> Result<Vec<PlanRecord>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for (i, result) in reader.deserialize::<PlanRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable row {} in {}: {}", i + 1, self.path.display(), e),
            }
        }
        Ok(records)
    }
}

impl PlanStore for CsvPlanCache {
    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, StorageError> {
        let latest = self
            .records()?
            .into_iter()
            .filter(|r| &r.user_id == user_id)
            // max_by_key keeps the last of equal timestamps, i.e. the later row
            .max_by_key(|r| r.saved_at);
        Ok(latest)
    }

    fn save(&self, record: &PlanRecord) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;
    use chrono::{Duration, Utc};

    fn record_for(user: &str, savings: f64, offset_minutes: i64) -> PlanRecord {
        let mut plan = Plan::default();
        plan.personal_info.current_savings = savings;
        plan.expenses.insert("Rent, utilities".to_string(), 1800.0);
        let saved_at = Utc::now() + Duration::minutes(offset_minutes);
        PlanRecord::from_plan(&plan, &UserId::new(user), saved_at)
    }

    #[test]
    fn test_missing_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CsvPlanCache::new(dir.path().join("cache.csv"));
        assert!(cache.records().unwrap().is_empty());
        assert!(cache.load(&UserId::new("alice")).unwrap().is_none());
    }

    #[test]
    fn test_appends_and_returns_latest_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CsvPlanCache::new(dir.path().join("nested").join("cache.csv"));

        cache.save(&record_for("alice", 100.0, 0)).unwrap();
        cache.save(&record_for("bob", 999.0, 1)).unwrap();
        cache.save(&record_for("alice", 300.0, 2)).unwrap();
        cache.save(&record_for("alice", 200.0, 1)).unwrap();

        assert_eq!(cache.records().unwrap().len(), 4);

        let latest = cache.load(&UserId::new("alice")).unwrap().unwrap();
        assert_eq!(latest.current_savings, 300.0);
        // Commas inside labels survive the CSV round trip
        assert_eq!(latest.to_plan().expenses.get("Rent, utilities"), Some(&1800.0));

        let contents = fs::read_to_string(cache.path()).unwrap();
        assert_eq!(contents.matches("user_id").count(), 1);
    }
}
