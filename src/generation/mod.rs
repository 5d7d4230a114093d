//! Generation service boundary
//!
//! Provides the client abstraction over the external generative model, the
//! prompt templates, the structured output schemas, and the four plan
//! generation steps built on top of them.

pub mod client;
pub mod prompt;
pub mod schema;
pub mod steps;

pub use client::{GeminiClient, GenerationClient, GenerationRequest};
pub use prompt::PromptEngine;
pub use schema::{EnvironmentalReport, OptimizedPlan, PlanAnalysis};
pub use steps::{AssessmentRequest, FinalizeRequest, OptimizationRequest, PlanGenerator};

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a generation call is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationPurpose {
    InitialPlan,
    Optimization,
    Assessment,
    FinalBlueprint,
}

impl GenerationPurpose {
    /// The user-facing message reported when this step fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            GenerationPurpose::InitialPlan => "Failed to generate the initial plan from AI.",
            GenerationPurpose::Optimization => "Failed to generate the optimized cost plan.",
            GenerationPurpose::Assessment => "Failed to generate the environmental report.",
            GenerationPurpose::FinalBlueprint => "Failed to generate the final blueprint.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationPurpose::InitialPlan => "initial-plan",
            GenerationPurpose::Optimization => "optimization",
            GenerationPurpose::Assessment => "assessment",
            GenerationPurpose::FinalBlueprint => "final-blueprint",
        }
    }
}

impl fmt::Display for GenerationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
