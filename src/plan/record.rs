//! Flat persistence schema for plans

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::{AssetClass, PersonalInfo, Plan, PostRetirementAllocation};

/// Identity of the plan owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saved plan, flattened to scalar columns so it fits a CSV row.
///
/// Labelled maps (income, expenses, goals) are stored as JSON strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub user_id: UserId,
    pub saved_at: DateTime<Utc>,

    // Personal info
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub current_savings: f64,
    pub inflation_rate_pct: f64,
    pub capital_gains_tax_rate_pct: f64,
    pub income_tax_rate_pct: f64,
    pub step_up_rate_pct: f64,

    // Totals, for reporting off the raw records
    pub total_income: f64,
    pub total_expenses: f64,

    // Investment buckets
    pub provident_fund_amount: f64,
    pub provident_fund_irr: f64,
    pub bank_deposit_amount: f64,
    pub bank_deposit_irr: f64,
    pub government_bills_amount: f64,
    pub government_bills_irr: f64,
    pub gold_amount: f64,
    pub gold_irr: f64,
    pub corporate_bonds_amount: f64,
    pub corporate_bonds_irr: f64,
    pub largecap_fund_amount: f64,
    pub largecap_fund_irr: f64,
    pub direct_stocks_amount: f64,
    pub direct_stocks_irr: f64,
    pub smallcap_fund_amount: f64,
    pub smallcap_fund_irr: f64,

    pub post_retirement_fixed_pct: f64,
    pub post_retirement_large_cap_pct: f64,

    pub income_json: String,
    pub expenses_json: String,
    pub goals_json: String,
}

impl PlanRecord {
    /// Flatten a plan for the given owner
    pub fn from_plan(plan: &Plan, user_id: &UserId, saved_at: DateTime<Utc>) -> Self {
        let bucket = |class: AssetClass| {
            plan.bucket(class)
                .map(|b| (b.amount, b.irr))
                .unwrap_or((0.0, crate::assumptions::default_irr(class)))
        };
        let (provident_fund_amount, provident_fund_irr) = bucket(AssetClass::ProvidentFund);
        let (bank_deposit_amount, bank_deposit_irr) = bucket(AssetClass::BankDeposit);
        let (government_bills_amount, government_bills_irr) = bucket(AssetClass::GovernmentBills);
        let (gold_amount, gold_irr) = bucket(AssetClass::Gold);
        let (corporate_bonds_amount, corporate_bonds_irr) = bucket(AssetClass::CorporateBonds);
        let (largecap_fund_amount, largecap_fund_irr) = bucket(AssetClass::LargecapFund);
        let (direct_stocks_amount, direct_stocks_irr) = bucket(AssetClass::DirectStocks);
        let (smallcap_fund_amount, smallcap_fund_irr) = bucket(AssetClass::SmallcapFund);

        let personal = &plan.personal_info;
        Self {
            user_id: user_id.clone(),
            saved_at,
            current_age: personal.current_age,
            retirement_age: personal.retirement_age,
            life_expectancy: personal.life_expectancy,
            current_savings: personal.current_savings,
            inflation_rate_pct: personal.inflation_rate_pct,
            capital_gains_tax_rate_pct: personal.capital_gains_tax_rate_pct,
            income_tax_rate_pct: personal.income_tax_rate_pct,
            step_up_rate_pct: personal.step_up_rate_pct,
            total_income: plan.total_income(),
            total_expenses: plan.total_expenses(),
            provident_fund_amount,
            provident_fund_irr,
            bank_deposit_amount,
            bank_deposit_irr,
            government_bills_amount,
            government_bills_irr,
            gold_amount,
            gold_irr,
            corporate_bonds_amount,
            corporate_bonds_irr,
            largecap_fund_amount,
            largecap_fund_irr,
            direct_stocks_amount,
            direct_stocks_irr,
            smallcap_fund_amount,
            smallcap_fund_irr,
            post_retirement_fixed_pct: plan.post_retirement.fixed_returns_pct,
            post_retirement_large_cap_pct: plan.post_retirement.large_cap_pct,
            income_json: encode_map(&plan.income),
            expenses_json: encode_map(&plan.expenses),
            goals_json: encode_map(&plan.goals),
        }
    }

    /// Rebuild the plan this record was flattened from
    pub fn to_plan(&self) -> Plan {
        let mut plan = Plan {
            personal_info: PersonalInfo {
                current_age: self.current_age,
                retirement_age: self.retirement_age,
                life_expectancy: self.life_expectancy,
                current_savings: self.current_savings,
                inflation_rate_pct: self.inflation_rate_pct,
                capital_gains_tax_rate_pct: self.capital_gains_tax_rate_pct,
                income_tax_rate_pct: self.income_tax_rate_pct,
                step_up_rate_pct: self.step_up_rate_pct,
            },
            income: decode_map(&self.income_json, "income"),
            expenses: decode_map(&self.expenses_json, "expenses"),
            investments: Vec::with_capacity(AssetClass::ALL.len()),
            post_retirement: PostRetirementAllocation {
                fixed_returns_pct: self.post_retirement_fixed_pct,
                large_cap_pct: self.post_retirement_large_cap_pct,
            },
            goals: decode_map(&self.goals_json, "goals"),
        };

        let buckets = [
            (AssetClass::ProvidentFund, self.provident_fund_amount, self.provident_fund_irr),
            (AssetClass::BankDeposit, self.bank_deposit_amount, self.bank_deposit_irr),
            (AssetClass::GovernmentBills, self.government_bills_amount, self.government_bills_irr),
            (AssetClass::Gold, self.gold_amount, self.gold_irr),
            (AssetClass::CorporateBonds, self.corporate_bonds_amount, self.corporate_bonds_irr),
            (AssetClass::LargecapFund, self.largecap_fund_amount, self.largecap_fund_irr),
            (AssetClass::DirectStocks, self.direct_stocks_amount, self.direct_stocks_irr),
            (AssetClass::SmallcapFund, self.smallcap_fund_amount, self.smallcap_fund_irr),
        ];
        for (class, amount, irr) in buckets {
            plan.set_bucket(class, amount, irr);
        }

        plan
    }
}

fn encode_map(map: &BTreeMap<String, f64>) -> String {
    // A map of finite floats always serializes
    serde_json::to_string(map).unwrap_or_else(|_| "{}".to_string())
}

fn decode_map(json: &str, what: &str) -> BTreeMap<String, f64> {
    match serde_json::from_str(json) {
        Ok(map) => map,
        Err(e) => {
            warn!("Discarding unreadable {} column in saved plan: {}", what, e);
            BTreeMap::new()
        }
    }
}
