//! Structured output shapes for the optimization and assessment steps
//!
//! Each shape has a response schema sent to the model and a [`Validate`]
//! impl applied after deserialization. Output that fails either check is
//! treated exactly like a transport failure.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Semantic checks applied to model output after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Cost plan rewritten to fit the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedPlan {
    #[serde(alias = "optimizedPlanCosting")]
    pub optimized_costing: String,
    pub explanation: String,
}

/// Environmental analysis of one plan variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAnalysis {
    pub environmental_risks: String,
    /// 0 to 100, higher is greener.
    pub green_score: f64,
    pub greener_alternatives: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalReport {
    pub original_plan_analysis: PlanAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_plan_analysis: Option<PlanAnalysis>,
    pub final_recommendation: String,
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("Field '{field}' is empty")));
    }
    Ok(())
}

impl Validate for OptimizedPlan {
    fn validate(&self) -> Result<()> {
        require_text("optimizedCosting", &self.optimized_costing)?;
        require_text("explanation", &self.explanation)
    }
}

impl Validate for PlanAnalysis {
    fn validate(&self) -> Result<()> {
        if !self.green_score.is_finite() || !(0.0..=100.0).contains(&self.green_score) {
            return Err(Error::Validation(format!(
                "Green score {} is outside 0-100",
                self.green_score
            )));
        }
        require_text("environmentalRisks", &self.environmental_risks)?;
        require_text("greenerAlternatives", &self.greener_alternatives)
    }
}

impl Validate for EnvironmentalReport {
    fn validate(&self) -> Result<()> {
        self.original_plan_analysis.validate()?;
        if let Some(optimized) = &self.optimized_plan_analysis {
            optimized.validate()?;
        }
        require_text("finalRecommendation", &self.final_recommendation)
    }
}

/// Response schema for [`OptimizedPlan`].
pub fn optimized_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "optimizedCosting": {
                "type": "STRING",
                "description": "The optimized city plan costing details within the budget."
            },
            "explanation": {
                "type": "STRING",
                "description": "Explanation of the changes made to the original plan to fit within the budget."
            }
        },
        "required": ["optimizedCosting", "explanation"]
    })
}

fn plan_analysis_schema(which: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "environmentalRisks": {
                "type": "STRING",
                "description": format!("Identified environmental risks of the {which} plan.")
            },
            "greenScore": {
                "type": "NUMBER",
                "description": format!("A Green Score (0-100) for the {which} plan.")
            },
            "greenerAlternatives": {
                "type": "STRING",
                "description": format!("Eco-friendly alternatives for the {which} plan.")
            }
        },
        "required": ["environmentalRisks", "greenScore", "greenerAlternatives"]
    })
}

/// Response schema for [`EnvironmentalReport`].
pub fn environmental_report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "originalPlanAnalysis": plan_analysis_schema("original"),
            "optimizedPlanAnalysis": plan_analysis_schema("optimized"),
            "finalRecommendation": {
                "type": "STRING",
                "description": "Final recommendation: Original, Optimized, or Hybrid plan."
            }
        },
        "required": ["originalPlanAnalysis", "finalRecommendation"]
    })
}
