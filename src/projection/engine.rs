//! Core projection engine for yearly savings projections

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::cashflows::{Analysis, LifeStage, ProjectionResult, YearlyProjectionRow};
use super::state::ProjectionState;
use crate::assumptions::{BlendedRates, PostRetirementRates, MAX_AGE};
use crate::plan::Plan;

/// How far past today the projection runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionHorizon {
    /// One row per year until the year before retirement
    #[default]
    UntilRetirement,
    /// Keep going after retirement, drawing down expenses, until life expectancy
    ThroughLifeExpectancy,
}

/// Configuration for a projection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub horizon: ProjectionHorizon,
}

/// Main projection engine
///
/// Projection is a pure function of the plan: the same plan always yields the
/// same result, and no input makes it fail.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run projection for a single plan
    pub fn project_plan(&self, plan: &Plan) -> ProjectionResult {
        let personal = &plan.personal_info;
        let rates = BlendedRates::from_buckets(&plan.investments, personal);
        let post_retirement = PostRetirementRates::from_allocation(&plan.post_retirement);

        let total_income = plan.total_income();
        let total_expenses = plan.total_expenses();
        let years_to_retirement = plan.years_to_retirement();
        let years_in_retirement = plan.years_in_retirement();

        let working_years = years_to_retirement.max(0) as u32;
        let total_years = match self.config.horizon {
            ProjectionHorizon::UntilRetirement => working_years,
            ProjectionHorizon::ThroughLifeExpectancy => {
                let lifetime = personal.life_expectancy as i64 - personal.current_age as i64;
                (lifetime.max(0) as u32).max(working_years)
            }
        };

        debug!(
            "Projecting {} years ({} working): blended return {:.3}%, blended tax {:.3}%",
            total_years, working_years, rates.blended_return, rates.blended_tax_rate
        );

        let mut state = ProjectionState::from_plan(plan);
        let mut rows = Vec::with_capacity(total_years.min(MAX_AGE) as usize);

        for _year in 1..=working_years {
            state.advance_year(plan);
            rows.push(self.working_year(plan, &rates, total_expenses, &mut state));
        }
        let savings_at_retirement = state.ending_savings;

        for _year in working_years + 1..=total_years {
            state.advance_year(plan);
            rows.push(self.retired_year(plan, &post_retirement, total_expenses, &mut state));
        }

        let total = rows.last().map(|r| r.ending_savings).unwrap_or(personal.current_savings);

        let retirement_corpus_needed = total_expenses
            * (1.0 + personal.inflation_rate_pct / 100.0).powf(years_to_retirement as f64)
            * 12.0
            * years_in_retirement as f64;

        let savings_rate = if total_income > 0.0 {
            round_to_tenth(rates.total_investment / total_income * 100.0)
        } else {
            0.0
        };

        let investment_allocation = plan
            .investments
            .iter()
            .map(|b| (b.asset_class, rates.share_of(b.amount)))
            .collect();

        let analysis = Analysis {
            savings_rate,
            years_to_retirement,
            monthly_surplus: total_income - total_expenses,
            projected_retirement_savings: savings_at_retirement,
            retirement_corpus_needed,
            investment_allocation,
        };

        let mut breakdown = BTreeMap::new();
        breakdown.insert("Current Savings".to_string(), personal.current_savings);
        breakdown.insert("Monthly Investment".to_string(), rates.total_investment);
        breakdown.insert("Expected Returns".to_string(), rates.blended_return);
        breakdown.insert("Effective Tax Rate".to_string(), rates.blended_tax_rate);
        breakdown.insert("Post-Retirement Returns".to_string(), post_retirement.returns);
        breakdown.insert("Retirement Corpus Needed".to_string(), retirement_corpus_needed);
        for (goal, target) in &plan.goals {
            breakdown.insert(format!("Goal: {}", goal), *target);
        }

        debug!(
            "Projection complete: {} rows, final savings {:.2}, corpus needed {:.2}",
            rows.len(),
            total,
            retirement_corpus_needed
        );

        ProjectionResult {
            total,
            breakdown,
            analysis,
            yearly_projections: rows,
        }
    }

    /// Accumulation year: grow at the after-tax blended return, then add the contribution
    fn working_year(
        &self,
        plan: &Plan,
        rates: &BlendedRates,
        total_expenses: f64,
        state: &mut ProjectionState,
    ) -> YearlyProjectionRow {
        let personal = &plan.personal_info;
        let annual_return = rates.net_annual_return();

        state.ending_savings =
            state.starting_savings * (1.0 + annual_return / 100.0) + state.annual_contribution;

        // Planned expenses are informational here; they do not reduce savings
        let planned_expenses = total_expenses * 12.0 * state.inflation_factor(personal.inflation_rate_pct);
        let additional_savings = state.annual_contribution * personal.step_up_rate_pct / 100.0;

        let row = YearlyProjectionRow {
            age: state.age,
            starting_savings: state.starting_savings,
            planned_expenses,
            additional_expenses: 0.0,
            additional_savings,
            ending_savings: state.ending_savings,
            status: LifeStage::at_age(state.age, personal.retirement_age, personal.life_expectancy),
        };

        state.annual_contribution += additional_savings;
        row
    }

    /// Drawdown year: grow at the post-retirement return, then pay the year's expenses
    fn retired_year(
        &self,
        plan: &Plan,
        post_retirement: &PostRetirementRates,
        total_expenses: f64,
        state: &mut ProjectionState,
    ) -> YearlyProjectionRow {
        let personal = &plan.personal_info;
        let planned_expenses = total_expenses * 12.0 * state.inflation_factor(personal.inflation_rate_pct);

        state.ending_savings = (state.starting_savings
            * (1.0 + post_retirement.net_annual_return() / 100.0)
            - planned_expenses)
            .max(0.0);

        YearlyProjectionRow {
            age: state.age,
            starting_savings: state.starting_savings,
            planned_expenses,
            additional_expenses: 0.0,
            additional_savings: 0.0,
            ending_savings: state.ending_savings,
            status: LifeStage::at_age(state.age, personal.retirement_age, personal.life_expectancy),
        }
    }
}

/// Project a plan with the default configuration
pub fn project(plan: &Plan) -> ProjectionResult {
    ProjectionEngine::default().project_plan(plan)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
