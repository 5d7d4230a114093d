//! Plan generation steps
//!
//! Each step renders its prompt, makes exactly one call through the
//! [`GenerationClient`], and validates the result. Any failure (transport,
//! API, malformed or invalid output) is logged with its cause and replaced by
//! the generic error for that step's purpose.

use super::client::{GenerationClient, GenerationRequest};
use super::prompt::PromptEngine;
use super::schema::{
    environmental_report_schema, optimized_plan_schema, EnvironmentalReport, OptimizedPlan,
    Validate,
};
use super::GenerationPurpose;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    pub original_costing: String,
    pub budget_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub city_plan_description: String,
    pub original_costing: Option<String>,
    pub optimized_costing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub city_description: String,
    pub optimization_explanation: String,
}

/// Runs the plan generation steps against a generation backend.
pub struct PlanGenerator {
    client: Arc<dyn GenerationClient>,
    prompts: PromptEngine,
}

impl PlanGenerator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Result<Self> {
        Ok(Self {
            client,
            prompts: PromptEngine::new()?,
        })
    }

    /// Generate the initial plan as free-form Markdown.
    pub async fn generate_initial_plan(
        &self,
        city_description: &str,
        budget_limit: f64,
    ) -> Result<String> {
        let purpose = GenerationPurpose::InitialPlan;
        let prompt = self
            .prompts
            .render_initial_plan(city_description, budget_limit)
            .map_err(|e| wrap_failure(purpose, e))?;
        self.call(GenerationRequest::text(purpose, prompt)).await
    }

    /// Ask for a cheaper costing. The returned total is not checked against
    /// the budget.
    pub async fn optimize_cost(&self, request: &OptimizationRequest) -> Result<OptimizedPlan> {
        let purpose = GenerationPurpose::Optimization;
        let prompt = self
            .prompts
            .render_optimization(request)
            .map_err(|e| wrap_failure(purpose, e))?;
        self.call_structured(purpose, prompt, optimized_plan_schema())
            .await
    }

    pub async fn assess_environmental_impact(
        &self,
        request: &AssessmentRequest,
    ) -> Result<EnvironmentalReport> {
        let purpose = GenerationPurpose::Assessment;
        let prompt = self
            .prompts
            .render_assessment(request)
            .map_err(|e| wrap_failure(purpose, e))?;
        self.call_structured(purpose, prompt, environmental_report_schema())
            .await
    }

    /// Generate the final blueprint and comparison as free-form Markdown.
    pub async fn generate_final_blueprint(&self, request: &FinalizeRequest) -> Result<String> {
        let purpose = GenerationPurpose::FinalBlueprint;
        let prompt = self
            .prompts
            .render_final_blueprint(request)
            .map_err(|e| wrap_failure(purpose, e))?;
        self.call(GenerationRequest::text(purpose, prompt)).await
    }

    async fn call(&self, request: GenerationRequest) -> Result<String> {
        let started = Instant::now();
        let result = self.client.generate(&request).await;
        debug!(
            purpose = %request.purpose,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Generation call finished"
        );
        result.map_err(|e| wrap_failure(request.purpose, e))
    }

    async fn call_structured<T>(
        &self,
        purpose: GenerationPurpose,
        prompt: String,
        schema: Value,
    ) -> Result<T>
    where
        T: DeserializeOwned + Validate,
    {
        let text = self
            .call(GenerationRequest::structured(purpose, prompt, schema))
            .await?;
        decode_output(&text).map_err(|e| wrap_failure(purpose, e))
    }
}

fn decode_output<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(text.trim())?;
    value.validate()?;
    Ok(value)
}

fn wrap_failure(purpose: GenerationPurpose, cause: Error) -> Error {
    // Already wrapped by an inner call
    if matches!(cause, Error::Generation { .. }) {
        return cause;
    }
    error!(purpose = %purpose, "Error in {} generation: {}", purpose, cause);
    Error::generation(purpose)
}
