//! Plan data structures: personal info, cash flows, and investment buckets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assumptions::{
    DEFAULT_CAPITAL_GAINS_TAX_RATE, DEFAULT_CURRENT_AGE, DEFAULT_INCOME_TAX_RATE,
    DEFAULT_INFLATION_RATE, DEFAULT_LIFE_EXPECTANCY, DEFAULT_POST_RETIREMENT_FIXED_PCT,
    DEFAULT_POST_RETIREMENT_LARGE_CAP_PCT, DEFAULT_RETIREMENT_AGE, DEFAULT_STEP_UP_RATE,
};

/// Tax treatment of an asset class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxClass {
    /// Fixed-income-like assets, taxed at the income tax rate
    SafeAsset,
    /// Equity-like assets, taxed at the capital gains rate
    StockMarket,
}

/// The eight asset classes a plan can contribute to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// VPF / EPF / PPF
    ProvidentFund,
    /// Recurring deposit / fixed deposit
    BankDeposit,
    GovernmentBills,
    Gold,
    CorporateBonds,
    LargecapFund,
    DirectStocks,
    SmallcapFund,
}

impl AssetClass {
    /// All asset classes in display order (safe assets first)
    pub const ALL: [AssetClass; 8] = [
        AssetClass::ProvidentFund,
        AssetClass::BankDeposit,
        AssetClass::GovernmentBills,
        AssetClass::Gold,
        AssetClass::CorporateBonds,
        AssetClass::LargecapFund,
        AssetClass::DirectStocks,
        AssetClass::SmallcapFund,
    ];

    pub fn tax_class(&self) -> TaxClass {
        match self {
            AssetClass::ProvidentFund
            | AssetClass::BankDeposit
            | AssetClass::GovernmentBills
            | AssetClass::Gold
            | AssetClass::CorporateBonds => TaxClass::SafeAsset,
            AssetClass::LargecapFund | AssetClass::DirectStocks | AssetClass::SmallcapFund => {
                TaxClass::StockMarket
            }
        }
    }

    /// Human-readable label used in reports and the breakdown map
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::ProvidentFund => "VPF/EPF/PPF",
            AssetClass::BankDeposit => "Recurring Deposit/Fixed Deposit",
            AssetClass::GovernmentBills => "Government Bills",
            AssetClass::Gold => "Gold",
            AssetClass::CorporateBonds => "Corporate Bonds",
            AssetClass::LargecapFund => "Largecap Fund",
            AssetClass::DirectStocks => "Direct Stocks",
            AssetClass::SmallcapFund => "Smallcap Fund",
        }
    }

    /// Short snake_case key used in plan documents and flat records
    pub fn key(&self) -> &'static str {
        match self {
            AssetClass::ProvidentFund => "provident_fund",
            AssetClass::BankDeposit => "bank_deposit",
            AssetClass::GovernmentBills => "government_bills",
            AssetClass::Gold => "gold",
            AssetClass::CorporateBonds => "corporate_bonds",
            AssetClass::LargecapFund => "largecap_fund",
            AssetClass::DirectStocks => "direct_stocks",
            AssetClass::SmallcapFund => "smallcap_fund",
        }
    }
}

/// Monthly contribution into one asset class with its assumed annual return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentBucket {
    pub asset_class: AssetClass,

    /// Monthly contribution amount
    pub amount: f64,

    /// Assumed annual return in percent
    pub irr: f64,
}

impl InvestmentBucket {
    /// Bucket with no contribution and the default return for its class
    pub fn empty(asset_class: AssetClass) -> Self {
        Self {
            asset_class,
            amount: 0.0,
            irr: crate::assumptions::default_irr(asset_class),
        }
    }
}

/// Personal and macro assumptions for the plan holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,

    /// Savings already accumulated today
    pub current_savings: f64,

    /// Annual inflation in percent
    pub inflation_rate_pct: f64,

    pub capital_gains_tax_rate_pct: f64,
    pub income_tax_rate_pct: f64,

    /// Annual increase applied to the contribution in percent
    pub step_up_rate_pct: f64,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            current_age: DEFAULT_CURRENT_AGE,
            retirement_age: DEFAULT_RETIREMENT_AGE,
            life_expectancy: DEFAULT_LIFE_EXPECTANCY,
            current_savings: 0.0,
            inflation_rate_pct: DEFAULT_INFLATION_RATE,
            capital_gains_tax_rate_pct: DEFAULT_CAPITAL_GAINS_TAX_RATE,
            income_tax_rate_pct: DEFAULT_INCOME_TAX_RATE,
            step_up_rate_pct: DEFAULT_STEP_UP_RATE,
        }
    }
}

/// Split of the corpus between fixed returns and large cap after retirement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostRetirementAllocation {
    /// Share held in fixed-return instruments, percent
    pub fixed_returns_pct: f64,
    /// Share held in large cap funds, percent
    pub large_cap_pct: f64,
}

impl Default for PostRetirementAllocation {
    fn default() -> Self {
        Self {
            fixed_returns_pct: DEFAULT_POST_RETIREMENT_FIXED_PCT,
            large_cap_pct: DEFAULT_POST_RETIREMENT_LARGE_CAP_PCT,
        }
    }
}

/// A complete, normalized financial plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub personal_info: PersonalInfo,

    /// Monthly income by label (Salary, Bonus, ...)
    pub income: BTreeMap<String, f64>,

    /// Monthly expenses by label (Housing, Food, ...)
    pub expenses: BTreeMap<String, f64>,

    /// One bucket per asset class, in `AssetClass::ALL` order
    pub investments: Vec<InvestmentBucket>,

    pub post_retirement: PostRetirementAllocation,

    /// Savings targets by label; informational only
    pub goals: BTreeMap<String, f64>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            income: BTreeMap::new(),
            expenses: BTreeMap::new(),
            investments: AssetClass::ALL.iter().map(|&c| InvestmentBucket::empty(c)).collect(),
            post_retirement: PostRetirementAllocation::default(),
            goals: BTreeMap::new(),
        }
    }
}

impl Plan {
    pub fn total_income(&self) -> f64 {
        self.income.values().sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.values().sum()
    }

    /// Look up the bucket for an asset class
    pub fn bucket(&self, asset_class: AssetClass) -> Option<&InvestmentBucket> {
        self.investments.iter().find(|b| b.asset_class == asset_class)
    }

    /// Set contribution and return for an asset class, replacing any existing bucket
    pub fn set_bucket(&mut self, asset_class: AssetClass, amount: f64, irr: f64) {
        let bucket = InvestmentBucket { asset_class, amount, irr };
        match self.investments.iter_mut().find(|b| b.asset_class == asset_class) {
            Some(existing) => *existing = bucket,
            None => self.investments.push(bucket),
        }
    }

    /// Total monthly contribution across all buckets
    pub fn total_investment(&self) -> f64 {
        self.investments.iter().map(|b| b.amount).sum()
    }

    /// Years left until retirement; negative when already past it
    pub fn years_to_retirement(&self) -> i64 {
        self.personal_info.retirement_age as i64 - self.personal_info.current_age as i64
    }

    /// Years between retirement and life expectancy; may be negative
    pub fn years_in_retirement(&self) -> i64 {
        self.personal_info.life_expectancy as i64 - self.personal_info.retirement_age as i64
    }
}
