//! Projection engine for yearly savings projections

mod state;
mod engine;
mod cashflows;

pub use state::ProjectionState;
pub use engine::{project, ProjectionConfig, ProjectionEngine, ProjectionHorizon};
pub use cashflows::{Analysis, LifeStage, ProjectionResult, ProjectionSummary, YearlyProjectionRow};
