//! Scenario runner for batch and what-if projections
//!
//! Every projection is independent, so batches fan out across the rayon pool.

use rayon::prelude::*;

use crate::plan::Plan;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Runs many projections with one configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// for (rate, result) in runner.run_step_up_sweep(&plan, &[3.0, 5.0, 8.0]) {
///     println!("{rate}% step-up -> {:.0}", result.total);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default projection config
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, plan: &Plan) -> ProjectionResult {
        self.engine.project_plan(plan)
    }

    /// Run projections for multiple plans in parallel; results keep input order
    pub fn run_batch(&self, plans: &[Plan]) -> Vec<ProjectionResult> {
        plans.par_iter().map(|plan| self.engine.project_plan(plan)).collect()
    }

    /// Re-run one plan under different step-up rates (percent)
    pub fn run_step_up_sweep(&self, plan: &Plan, rates: &[f64]) -> Vec<(f64, ProjectionResult)> {
        rates
            .par_iter()
            .map(|&rate| {
                let mut variant = plan.clone();
                variant.personal_info.step_up_rate_pct = rate;
                (rate, self.engine.project_plan(&variant))
            })
            .collect()
    }

    /// Re-run one plan under different retirement ages
    pub fn run_retirement_age_sweep(&self, plan: &Plan, ages: &[u32]) -> Vec<(u32, ProjectionResult)> {
        ages.par_iter()
            .map(|&age| {
                let mut variant = plan.clone();
                variant.personal_info.retirement_age = age;
                (age, self.engine.project_plan(&variant))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::AssetClass;

    fn test_plan() -> Plan {
        let mut plan = Plan::default();
        plan.personal_info.current_age = 30;
        plan.personal_info.retirement_age = 60;
        plan.personal_info.current_savings = 10_000.0;
        plan.set_bucket(AssetClass::BankDeposit, 500.0, 7.0);
        plan.set_bucket(AssetClass::LargecapFund, 1500.0, 12.0);
        plan
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ScenarioRunner::new();
        let mut other = test_plan();
        other.personal_info.current_savings = 0.0;
        let plans = vec![test_plan(), other];

        let results = runner.run_batch(&plans);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], runner.run(&plans[0]));
        assert_eq!(results[1], runner.run(&plans[1]));
        assert!(results[0].total > results[1].total);
    }

    #[test]
    fn test_higher_step_up_grows_more() {
        let runner = ScenarioRunner::new();
        let results = runner.run_step_up_sweep(&test_plan(), &[0.0, 5.0, 10.0]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 0.0);
        assert!(results[0].1.total < results[1].1.total);
        assert!(results[1].1.total < results[2].1.total);
        assert!(results[0].1.yearly_projections.iter().all(|r| r.additional_savings == 0.0));
    }

    #[test]
    fn test_retirement_age_sweep_row_counts() {
        let runner = ScenarioRunner::new();
        let results = runner.run_retirement_age_sweep(&test_plan(), &[25, 55, 60]);

        let counts: Vec<_> = results.iter().map(|(_, r)| r.yearly_projections.len()).collect();
        assert_eq!(counts, vec![0, 25, 30]);
        assert_eq!(results[0].1.total, 10_000.0);
    }
}
