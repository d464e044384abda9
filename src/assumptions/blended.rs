//! Amount-weighted blended return and tax across investment buckets

use serde::{Deserialize, Serialize};

use super::{
    POST_RETIREMENT_FIXED_RETURN, POST_RETIREMENT_FIXED_TAX, POST_RETIREMENT_LARGE_CAP_RETURN,
    POST_RETIREMENT_LARGE_CAP_TAX,
};
use crate::plan::{InvestmentBucket, PersonalInfo, PostRetirementAllocation, TaxClass};

/// Portfolio-level rates derived from the bucket set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedRates {
    /// Monthly contribution into safe assets
    pub total_safe_assets: f64,

    /// Monthly contribution into stock market assets
    pub total_stock_market: f64,

    /// Monthly contribution across all buckets
    pub total_investment: f64,

    /// Amount-weighted nominal return, percent
    pub blended_return: f64,

    /// Amount-weighted tax rate, percent
    pub blended_tax_rate: f64,
}

impl BlendedRates {
    /// Blend the buckets using the plan holder's tax rates.
    ///
    /// Safe assets are taxed at the income tax rate, stock market assets at the
    /// capital gains rate. With no contributions both rates are 0.
    pub fn from_buckets(buckets: &[InvestmentBucket], personal: &PersonalInfo) -> Self {
        let mut total_safe_assets = 0.0;
        let mut total_stock_market = 0.0;
        let mut weighted_return = 0.0;

        for bucket in buckets {
            match bucket.asset_class.tax_class() {
                TaxClass::SafeAsset => total_safe_assets += bucket.amount,
                TaxClass::StockMarket => total_stock_market += bucket.amount,
            }
            weighted_return += bucket.amount * bucket.irr;
        }

        let total_investment = total_safe_assets + total_stock_market;

        let (blended_return, blended_tax_rate) = if total_investment == 0.0 {
            (0.0, 0.0)
        } else {
            let tax = (total_safe_assets * personal.income_tax_rate_pct
                + total_stock_market * personal.capital_gains_tax_rate_pct)
                / total_investment;
            (weighted_return / total_investment, tax)
        };

        Self {
            total_safe_assets,
            total_stock_market,
            total_investment,
            blended_return,
            blended_tax_rate,
        }
    }

    /// Annual return after a flat tax haircut, percent
    pub fn net_annual_return(&self) -> f64 {
        self.blended_return * (1.0 - self.blended_tax_rate / 100.0)
    }

    /// Share of each contribution in the total, percent; 0 when nothing is invested
    pub fn share_of(&self, amount: f64) -> f64 {
        if self.total_investment == 0.0 {
            0.0
        } else {
            amount / self.total_investment * 100.0
        }
    }
}

/// Rates for the corpus once contributions stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostRetirementRates {
    /// Gross return, percent
    pub returns: f64,
    /// Effective tax, percent
    pub tax_rate: f64,
}

impl PostRetirementRates {
    pub fn from_allocation(allocation: &PostRetirementAllocation) -> Self {
        let returns = (allocation.fixed_returns_pct * POST_RETIREMENT_FIXED_RETURN
            + allocation.large_cap_pct * POST_RETIREMENT_LARGE_CAP_RETURN)
            / 100.0;
        let tax_rate = (allocation.fixed_returns_pct * POST_RETIREMENT_FIXED_TAX
            + allocation.large_cap_pct * POST_RETIREMENT_LARGE_CAP_TAX)
            / 100.0;
        Self { returns, tax_rate }
    }

    /// Return after tax, percent
    pub fn net_annual_return(&self) -> f64 {
        self.returns * (1.0 - self.tax_rate / 100.0)
    }
}
