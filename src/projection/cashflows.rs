//! Projection output structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::plan::AssetClass;

/// Lifecycle stage of the plan holder in a projection year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeStage {
    Working,
    Retired,
    Dead,
}

impl LifeStage {
    /// Stage at a given age: past life expectancy wins over retirement
    pub fn at_age(age: u32, retirement_age: u32, life_expectancy: u32) -> Self {
        if age >= life_expectancy {
            LifeStage::Dead
        } else if age >= retirement_age {
            LifeStage::Retired
        } else {
            LifeStage::Working
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStage::Working => "Working",
            LifeStage::Retired => "Retired",
            LifeStage::Dead => "Dead",
        }
    }
}

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjectionRow {
    /// Age at the start of the year
    pub age: u32,

    pub starting_savings: f64,

    /// Annual expenses grown by inflation; shown for comparison, not deducted while working
    pub planned_expenses: f64,

    /// Reserved for one-off expenses; always 0
    pub additional_expenses: f64,

    /// Step-up added to next year's contribution
    pub additional_savings: f64,

    pub ending_savings: f64,

    pub status: LifeStage,
}

/// Headline figures derived from a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Monthly investment as a share of monthly income, percent, one decimal
    pub savings_rate: f64,

    /// Signed; negative when the retirement age has already passed
    pub years_to_retirement: i64,

    /// Monthly income minus monthly expenses
    pub monthly_surplus: f64,

    /// Savings at the retirement boundary
    pub projected_retirement_savings: f64,

    /// Lump sum needed to fund inflated expenses through life expectancy
    pub retirement_corpus_needed: f64,

    /// Share of the monthly investment per asset class, percent
    pub investment_allocation: BTreeMap<AssetClass, f64>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Ending savings of the last projected year
    pub total: f64,

    /// Labelled scalars for display
    pub breakdown: BTreeMap<String, f64>,

    pub analysis: Analysis,

    /// One row per year in increasing age order
    pub yearly_projections: Vec<YearlyProjectionRow>,
}

impl ProjectionResult {
    /// Rows for a given life stage
    pub fn rows_in_stage(&self, stage: LifeStage) -> impl Iterator<Item = &YearlyProjectionRow> {
        self.yearly_projections.iter().filter(move |r| r.status == stage)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let peak_savings = self
            .yearly_projections
            .iter()
            .map(|r| r.ending_savings)
            .fold(None, |peak: Option<f64>, s| Some(peak.map_or(s, |p| p.max(s))));

        ProjectionSummary {
            total_years: self.yearly_projections.len() as u32,
            working_years: self.rows_in_stage(LifeStage::Working).count() as u32,
            retired_years: self.rows_in_stage(LifeStage::Retired).count() as u32,
            total_step_up: self.yearly_projections.iter().map(|r| r.additional_savings).sum(),
            peak_savings: peak_savings.unwrap_or(self.total),
            final_savings: self.total,
            corpus_gap: self.analysis.retirement_corpus_needed
                - self.analysis.projected_retirement_savings,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub working_years: u32,
    pub retired_years: u32,
    pub total_step_up: f64,
    pub peak_savings: f64,
    pub final_savings: f64,

    /// Corpus needed minus savings at retirement; negative means a surplus
    pub corpus_gap: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_stage_boundaries() {
        assert_eq!(LifeStage::at_age(64, 65, 85), LifeStage::Working);
        assert_eq!(LifeStage::at_age(65, 65, 85), LifeStage::Retired);
        assert_eq!(LifeStage::at_age(85, 65, 85), LifeStage::Dead);
        // Life expectancy before retirement: dead wins
        assert_eq!(LifeStage::at_age(55, 65, 50), LifeStage::Dead);
    }

    #[test]
    fn test_summary_of_empty_projection() {
        let result = ProjectionResult {
            total: 5000.0,
            breakdown: BTreeMap::new(),
            analysis: Analysis {
                savings_rate: 0.0,
                years_to_retirement: 0,
                monthly_surplus: 0.0,
                projected_retirement_savings: 5000.0,
                retirement_corpus_needed: 8000.0,
                investment_allocation: BTreeMap::new(),
            },
            yearly_projections: Vec::new(),
        };

        let summary = result.summary();
        assert_eq!(summary.total_years, 0);
        assert_eq!(summary.peak_savings, 5000.0);
        assert_eq!(summary.final_savings, 5000.0);
        assert_eq!(summary.corpus_gap, 3000.0);
    }
}
