//! Boundary checks for plans
//!
//! The projection engine accepts any plan. These checks exist so an input
//! surface can warn the user about figures that produce a degenerate projection.

use thiserror::Error;

use super::Plan;

/// Something about a plan worth telling the user
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanIssue {
    #[error("retirement age {retirement_age} is not after current age {current_age}")]
    RetirementNotAhead { current_age: u32, retirement_age: u32 },

    #[error("life expectancy {life_expectancy} is before retirement age {retirement_age}")]
    LifeExpectancyBeforeRetirement { retirement_age: u32, life_expectancy: u32 },

    #[error("{field} is negative ({value})")]
    NegativeAmount { field: String, value: f64 },

    #[error("{field} should be a percentage between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
}

impl Plan {
    /// Collect every issue with the plan; an empty list means it looks sane
    pub fn validate(&self) -> Vec<PlanIssue> {
        let mut issues = Vec::new();
        let personal = &self.personal_info;

        if personal.retirement_age <= personal.current_age {
            issues.push(PlanIssue::RetirementNotAhead {
                current_age: personal.current_age,
                retirement_age: personal.retirement_age,
            });
        }
        if personal.life_expectancy < personal.retirement_age {
            issues.push(PlanIssue::LifeExpectancyBeforeRetirement {
                retirement_age: personal.retirement_age,
                life_expectancy: personal.life_expectancy,
            });
        }

        let mut amounts: Vec<(String, f64)> = vec![("current savings".to_string(), personal.current_savings)];
        amounts.extend(self.income.iter().map(|(k, v)| (format!("income '{}'", k), *v)));
        amounts.extend(self.expenses.iter().map(|(k, v)| (format!("expense '{}'", k), *v)));
        amounts.extend(
            self.investments
                .iter()
                .map(|b| (format!("{} contribution", b.asset_class.label()), b.amount)),
        );
        for (field, value) in amounts {
            if value < 0.0 {
                issues.push(PlanIssue::NegativeAmount { field, value });
            }
        }

        let percentages = [
            ("inflation rate", personal.inflation_rate_pct),
            ("capital gains tax rate", personal.capital_gains_tax_rate_pct),
            ("income tax rate", personal.income_tax_rate_pct),
            ("step-up rate", personal.step_up_rate_pct),
            ("post-retirement fixed returns share", self.post_retirement.fixed_returns_pct),
            ("post-retirement large cap share", self.post_retirement.large_cap_pct),
        ];
        for (field, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                issues.push(PlanIssue::PercentOutOfRange { field, value });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::AssetClass;

    #[test]
    fn test_default_plan_is_clean() {
        assert!(Plan::default().validate().is_empty());
    }

    #[test]
    fn test_degenerate_ages_flagged() {
        let mut plan = Plan::default();
        plan.personal_info.current_age = 66;
        plan.personal_info.retirement_age = 65;
        plan.personal_info.life_expectancy = 60;

        let issues = plan.validate();
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].to_string(),
            "retirement age 65 is not after current age 66"
        );
        assert!(matches!(issues[1], PlanIssue::LifeExpectancyBeforeRetirement { .. }));
    }

    #[test]
    fn test_negative_amounts_and_rates_flagged() {
        let mut plan = Plan::default();
        plan.expenses.insert("Food".to_string(), -20.0);
        plan.set_bucket(AssetClass::Gold, -5.0, 7.0);
        plan.personal_info.income_tax_rate_pct = 130.0;

        let issues = plan.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.to_string() == "expense 'Food' is negative (-20)"));
        assert!(issues
            .iter()
            .any(|i| matches!(i, PlanIssue::PercentOutOfRange { field: "income tax rate", .. })));
    }
}
