//! Projection with best-effort persistence of the plan

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use chrono::Utc;

use crate::plan::{Plan, PlanRecord, UserId};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use crate::storage::{PlanRepository, SaveOutcome};

/// Runs projections and saves each projected plan in the background
pub struct Planner {
    engine: ProjectionEngine,
    repository: Option<Arc<PlanRepository>>,
}

/// Pending background save; dropping it leaves the save running
#[derive(Debug)]
pub struct SaveHandle {
    receiver: Option<Receiver<SaveOutcome>>,
}

impl SaveHandle {
    fn none() -> Self {
        Self { receiver: None }
    }

    /// Block until the save settles. `None` if there was nothing to save.
    pub fn wait(self) -> Option<SaveOutcome> {
        let receiver = self.receiver?;
        // A worker that vanished without reporting never persisted anything
        Some(receiver.recv().unwrap_or(SaveOutcome::Dropped))
    }
}

impl Planner {
    /// Planner that only projects
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
            repository: None,
        }
    }

    /// Planner that also saves plans of identified users
    pub fn with_repository(config: ProjectionConfig, repository: PlanRepository) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
            repository: Some(Arc::new(repository)),
        }
    }

    pub fn repository(&self) -> Option<&PlanRepository> {
        self.repository.as_deref()
    }

    /// Load a user's plan, or the default plan when there is no repository
    pub fn load_plan(&self, user_id: &UserId) -> Plan {
        match &self.repository {
            Some(repository) => repository.load(user_id),
            None => Plan::default(),
        }
    }

    /// Project the plan and submit it for saving without waiting on the save
    pub fn compute_projection(&self, plan: &Plan, user_id: Option<&UserId>) -> ProjectionResult {
        self.compute_projection_tracked(plan, user_id).0
    }

    /// Like [`Planner::compute_projection`], also returning a handle on the save
    pub fn compute_projection_tracked(
        &self,
        plan: &Plan,
        user_id: Option<&UserId>,
    ) -> (ProjectionResult, SaveHandle) {
        let result = self.engine.project_plan(plan);

        let handle = match (&self.repository, user_id) {
            (Some(repository), Some(user_id)) => {
                let record = PlanRecord::from_plan(plan, user_id, Utc::now());
                submit_save(Arc::clone(repository), record)
            }
            _ => SaveHandle::none(),
        };

        (result, handle)
    }
}

fn submit_save(repository: Arc<PlanRepository>, record: PlanRecord) -> SaveHandle {
    let (sender, receiver) = mpsc::channel();
    rayon::spawn(move || {
        let outcome = repository.save(&record);
        // Nobody listening is fine
        let _ = sender.send(outcome);
    });
    SaveHandle {
        receiver: Some(receiver),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::AssetClass;
    use crate::projection::project;
    use crate::storage::testing::MemoryStore;
    use crate::storage::{CsvPlanCache, JsonDirectoryStore, PlanStore, StorageError};
    use std::sync::mpsc::Sender;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Store whose saves block until the test opens the gate
    struct GatedStore {
        gate: Mutex<Receiver<()>>,
        saved: Mutex<Sender<String>>,
    }

    impl PlanStore for GatedStore {
        fn load(&self, _user_id: &UserId) -> Result<Option<PlanRecord>, StorageError> {
            Ok(None)
        }

        fn save(&self, record: &PlanRecord) -> Result<(), StorageError> {
            let _ = self.gate.lock().unwrap().recv();
            let _ = self.saved.lock().unwrap().send(record.user_id.to_string());
            Ok(())
        }
    }

    fn sample_plan() -> Plan {
        let mut plan = Plan::default();
        plan.personal_info.current_savings = 50_000.0;
        plan.set_bucket(AssetClass::DirectStocks, 2000.0, 13.0);
        plan
    }

    #[test]
    fn test_projection_without_identity_skips_save() {
        let dir = tempfile::tempdir().unwrap();
        let repository = PlanRepository::new(
            Box::new(JsonDirectoryStore::new(dir.path().join("plans"))),
            Box::new(CsvPlanCache::new(dir.path().join("cache.csv"))),
        );
        let planner = Planner::with_repository(ProjectionConfig::default(), repository);

        let (result, handle) = planner.compute_projection_tracked(&sample_plan(), None);
        assert_eq!(result, project(&sample_plan()));
        assert_eq!(handle.wait(), None);
        assert!(!dir.path().join("plans").exists());
    }

    #[test]
    fn test_projection_saves_to_primary() {
        let dir = tempfile::tempdir().unwrap();
        let repository = PlanRepository::new(
            Box::new(JsonDirectoryStore::new(dir.path().join("plans"))),
            Box::new(CsvPlanCache::new(dir.path().join("cache.csv"))),
        );
        let planner = Planner::with_repository(ProjectionConfig::default(), repository);
        let user = UserId::new("carol");

        let (result, handle) = planner.compute_projection_tracked(&sample_plan(), Some(&user));
        assert_eq!(result.yearly_projections.len(), 35);
        assert_eq!(handle.wait(), Some(SaveOutcome::Primary));
        assert_eq!(planner.load_plan(&user), sample_plan());
    }

    #[test]
    fn test_failed_saves_never_affect_the_projection() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the store expects a directory makes every save fail
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let repository = PlanRepository::new(
            Box::new(JsonDirectoryStore::new(blocker.join("plans"))),
            Box::new(CsvPlanCache::new(blocker.join("cache.csv"))),
        );
        let planner = Planner::with_repository(ProjectionConfig::default(), repository);

        let (result, handle) =
            planner.compute_projection_tracked(&sample_plan(), Some(&UserId::new("dave")));
        assert_eq!(result, project(&sample_plan()));
        assert_eq!(handle.wait(), Some(SaveOutcome::Dropped));
    }

    #[test]
    fn test_plain_planner_loads_default() {
        let planner = Planner::new(ProjectionConfig::default());
        assert!(planner.repository().is_none());
        assert_eq!(planner.load_plan(&UserId::new("erin")), Plan::default());
    }

    #[test]
    fn test_projection_returns_before_save_completes() {
        let (open_gate, gate) = mpsc::channel();
        let (saved_tx, saved) = mpsc::channel();
        let store = GatedStore {
            gate: Mutex::new(gate),
            saved: Mutex::new(saved_tx),
        };
        let repository = PlanRepository::new(Box::new(store), Box::new(MemoryStore::default()));
        let planner = Planner::with_repository(ProjectionConfig::default(), repository);

        let result = planner.compute_projection(&sample_plan(), Some(&UserId::new("frank")));
        assert_eq!(result, project(&sample_plan()));
        // The save is still held at the gate
        assert!(saved.try_recv().is_err());

        open_gate.send(()).unwrap();
        assert_eq!(saved.recv_timeout(Duration::from_secs(10)).unwrap(), "frank");
    }
}
