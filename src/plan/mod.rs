//! Plan data structures, loading, and persistence records

mod data;
pub mod loader;
mod record;
mod validate;

pub use data::{AssetClass, InvestmentBucket, PersonalInfo, Plan, PostRetirementAllocation, TaxClass};
pub use loader::{load_plan, load_plan_from_reader, plan_from_value, PlanError};
pub use record::{PlanRecord, UserId};
pub use validate::PlanIssue;
