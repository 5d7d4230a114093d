//! Pipeline state and the snapshot handed to presentation layers

use super::BUDGET_LIMIT;
use crate::extract::{FinalBlueprint, ParsedPlan};
use crate::generation::{EnvironmentalReport, OptimizedPlan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which phase a pipeline is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Initial,
    Loading,
    Done,
    Optimizing,
    Optimized,
    Finalizing,
    Finalized,
    Evaluating,
    Evaluated,
    Error,
}

impl Stage {
    /// A generation call is outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Stage::Loading | Stage::Optimizing | Stage::Finalizing | Stage::Evaluating
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Evaluated | Stage::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initial => "initial",
            Stage::Loading => "loading",
            Stage::Done => "done",
            Stage::Optimizing => "optimizing",
            Stage::Optimized => "optimized",
            Stage::Finalizing => "finalizing",
            Stage::Finalized => "finalized",
            Stage::Evaluating => "evaluating",
            Stage::Evaluated => "evaluated",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transition that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStage {
    Initial,
    Optimization,
    Finalization,
    Evaluation,
}

impl ErrorStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorStage::Initial => "initial",
            ErrorStage::Optimization => "optimization",
            ErrorStage::Finalization => "finalization",
            ErrorStage::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: ErrorStage,
    pub message: String,
}

/// Everything one pipeline run has accumulated.
///
/// Only the orchestrator mutates this. Once `stage` is `Error`, `error` is
/// set; in every other stage it is `None`.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub stage: Stage,
    pub description: String,
    pub plan: Option<ParsedPlan>,
    pub grand_total: f64,
    pub optimized: Option<OptimizedPlan>,
    pub final_blueprint: Option<FinalBlueprint>,
    pub report: Option<EnvironmentalReport>,
    pub error: Option<StageError>,
    pub updated_at: DateTime<Utc>,
}

impl PipelineState {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            stage: Stage::Initial,
            description: description.into(),
            plan: None,
            grand_total: 0.0,
            optimized: None,
            final_blueprint: None,
            report: None,
            error: None,
            updated_at: Utc::now(),
        }
    }

    /// Derived from the grand total on every call.
    pub fn is_over_budget(&self) -> bool {
        exceeds_budget(self.grand_total)
    }

    /// The original costing, if the cost estimate section was extracted.
    pub fn original_costing(&self) -> Option<&str> {
        self.plan
            .as_ref()
            .filter(|plan| plan.has_costing())
            .map(|plan| plan.costing.as_str())
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.touch();
    }

    pub(crate) fn fail(&mut self, stage: ErrorStage, message: impl Into<String>) {
        self.stage = Stage::Error;
        self.error = Some(StageError {
            stage,
            message: message.into(),
        });
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            stage: self.stage,
            description: self.description.clone(),
            plan: self.plan.clone(),
            grand_total: self.grand_total,
            budget_limit: BUDGET_LIMIT,
            over_budget: self.is_over_budget(),
            optimized_plan: self.optimized.clone(),
            final_blueprint: self.final_blueprint.clone(),
            environmental_report: self.report.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// The budget decision: strictly greater than the limit.
pub fn exceeds_budget(grand_total: f64) -> bool {
    grand_total > BUDGET_LIMIT
}

/// Read-only view of a pipeline for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub stage: Stage,
    pub description: String,
    #[serde(flatten)]
    pub plan: Option<ParsedPlan>,
    pub grand_total: f64,
    pub budget_limit: f64,
    pub over_budget: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_plan: Option<OptimizedPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_blueprint: Option<FinalBlueprint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environmental_report: Option<EnvironmentalReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StageError>,
    pub updated_at: DateTime<Utc>,
}
