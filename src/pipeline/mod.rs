//! Plan pipeline
//!
//! Sequences the generation steps over one [`PipelineState`], guarding
//! against results that arrive after the pipeline has moved on.

pub mod orchestrator;
pub mod runner;
pub mod state;

pub use orchestrator::{PlanOrchestrator, Transition};
pub use runner::PlanRunner;
pub use state::{exceeds_budget, ErrorStage, PipelineState, PlanSnapshot, Stage, StageError};

/// Grand totals strictly above this many rupees trigger optimization.
pub const BUDGET_LIMIT: f64 = 1_000_000.0;
