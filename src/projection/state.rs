//! Projection state carried from one year to the next

use crate::plan::Plan;

/// State of the plan at a point in time during projection
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current projection year (1-indexed, 0 before the first year)
    pub year: u32,

    /// Age at the start of the current year
    pub age: u32,

    /// Savings at the start of the current year
    pub starting_savings: f64,

    /// Savings at the end of the current year
    pub ending_savings: f64,

    /// Contribution paid in during the current year; grows by the step-up, never reset
    pub annual_contribution: f64,
}

impl ProjectionState {
    /// Initialize state from a plan at projection start
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            year: 0,
            age: plan.personal_info.current_age,
            starting_savings: plan.personal_info.current_savings,
            ending_savings: plan.personal_info.current_savings,
            annual_contribution: plan.total_investment() * 12.0,
        }
    }

    /// Advance to next year; the new year starts where the last one ended
    pub fn advance_year(&mut self, plan: &Plan) {
        self.year += 1;
        self.age = plan.personal_info.current_age + self.year - 1;
        self.starting_savings = self.ending_savings;
    }

    /// Inflation multiplier for the current year relative to today
    pub fn inflation_factor(&self, inflation_rate_pct: f64) -> f64 {
        (1.0 + inflation_rate_pct / 100.0).powi(self.year.saturating_sub(1) as i32)
    }
}
