//! Retirement Planner - deterministic savings projection engine
//!
//! This library provides:
//! - A strongly typed financial plan with a lenient loader for raw input
//! - Amount-weighted blended returns and taxes across eight asset classes
//! - Year-by-year savings projections with lifecycle tagging and corpus estimates
//! - Best-effort plan persistence with a local cache fallback
//! - Batch and what-if scenario runs

pub mod plan;
pub mod assumptions;
pub mod projection;
pub mod storage;
pub mod planner;
pub mod scenario;

// Re-export commonly used types
pub use plan::{AssetClass, Plan, PlanRecord, UserId};
pub use assumptions::BlendedRates;
pub use projection::{ProjectionEngine, ProjectionResult, YearlyProjectionRow};
pub use planner::Planner;
pub use scenario::ScenarioRunner;
