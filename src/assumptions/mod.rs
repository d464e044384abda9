//! Planning assumptions: contractual defaults and blended portfolio rates

mod blended;

pub use blended::{BlendedRates, PostRetirementRates};

use crate::plan::AssetClass;

/// Age used when the plan does not state one
pub const DEFAULT_CURRENT_AGE: u32 = 30;
pub const DEFAULT_RETIREMENT_AGE: u32 = 65;
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 85;

/// Oldest age accepted from a plan document; anything above is treated as missing
pub const MAX_AGE: u32 = 150;

/// Annual inflation, percent
pub const DEFAULT_INFLATION_RATE: f64 = 6.0;

/// Annual contribution step-up, percent
pub const DEFAULT_STEP_UP_RATE: f64 = 5.0;

pub const DEFAULT_CAPITAL_GAINS_TAX_RATE: f64 = 20.0;
pub const DEFAULT_INCOME_TAX_RATE: f64 = 30.0;

pub const DEFAULT_POST_RETIREMENT_FIXED_PCT: f64 = 50.0;
pub const DEFAULT_POST_RETIREMENT_LARGE_CAP_PCT: f64 = 50.0;

/// Return and tax of the fixed-return approach used after retirement, percent
pub const POST_RETIREMENT_FIXED_RETURN: f64 = 7.0;
pub const POST_RETIREMENT_FIXED_TAX: f64 = 30.0;

/// Return and tax of the large cap approach used after retirement, percent
pub const POST_RETIREMENT_LARGE_CAP_RETURN: f64 = 12.0;
pub const POST_RETIREMENT_LARGE_CAP_TAX: f64 = 20.0;

/// Default annual return for an asset class, percent
pub fn default_irr(asset_class: AssetClass) -> f64 {
    match asset_class {
        AssetClass::ProvidentFund
        | AssetClass::BankDeposit
        | AssetClass::GovernmentBills
        | AssetClass::Gold
        | AssetClass::CorporateBonds => 7.0,
        AssetClass::LargecapFund => 12.0,
        AssetClass::DirectStocks => 10.0,
        AssetClass::SmallcapFund => 18.0,
    }
}
