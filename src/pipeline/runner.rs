//! Sequential driver over the orchestrator
//!
//! Runs start, then optimize when the initial plan is over budget, then the
//! final blueprint and the environmental assessment. Stops at the first
//! step that lands in the error stage and returns the snapshot as-is.

use super::orchestrator::{PlanOrchestrator, Transition};
use super::state::{PlanSnapshot, Stage};
use crate::error::{Error, Result};
use crate::generation::PlanGenerator;
use std::sync::Arc;
use tracing::info;

pub struct PlanRunner {
    orchestrator: PlanOrchestrator,
    optimize: bool,
    final_blueprint: bool,
    assess: bool,
}

impl PlanRunner {
    pub fn new(generator: Arc<PlanGenerator>) -> Self {
        Self {
            orchestrator: PlanOrchestrator::new(generator),
            optimize: true,
            final_blueprint: true,
            assess: true,
        }
    }

    /// Optimize over-budget plans. On by default.
    pub fn with_optimization(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    /// Generate the final blueprint after a successful optimization. On by default.
    pub fn with_final_blueprint(mut self, enabled: bool) -> Self {
        self.final_blueprint = enabled;
        self
    }

    pub fn with_assessment(mut self, enabled: bool) -> Self {
        self.assess = enabled;
        self
    }

    /// Run a fresh plan, discarding whatever a previous run left behind.
    pub async fn run(&self, description: &str) -> Result<PlanSnapshot> {
        self.orchestrator.reset().await;
        let mut stage = applied(self.orchestrator.start(description).await?)?;

        if stage == Stage::Done && self.optimize {
            let over_budget = self
                .orchestrator
                .snapshot()
                .await
                .is_some_and(|snapshot| snapshot.over_budget);

            if over_budget {
                stage = applied(self.orchestrator.optimize().await?)?;
                if stage == Stage::Optimized && self.final_blueprint {
                    stage = applied(self.orchestrator.finalize().await?)?;
                }
            } else {
                info!("Initial plan is within budget, skipping optimization");
            }
        }

        if stage != Stage::Error && self.assess {
            applied(self.orchestrator.evaluate().await?)?;
        }

        self.orchestrator
            .snapshot()
            .await
            .ok_or_else(|| Error::External("Plan was discarded during the run".to_string()))
    }
}

fn applied(transition: Transition) -> Result<Stage> {
    match transition {
        Transition::Applied(stage) => Ok(stage),
        Transition::Superseded => Err(Error::External(
            "Plan was superseded during the run".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationPurpose;
    use crate::testing::{fixtures, MockGenerationClient};

    fn runner(mock: MockGenerationClient) -> (PlanRunner, Arc<MockGenerationClient>) {
        let mock = Arc::new(mock);
        let generator = Arc::new(PlanGenerator::new(mock.clone()).unwrap());
        (PlanRunner::new(generator), mock)
    }

    fn scripted(grand_total: &str) -> MockGenerationClient {
        MockGenerationClient::builder()
            .with_success(GenerationPurpose::InitialPlan, &fixtures::plan_text(grand_total))
            .with_success(
                GenerationPurpose::Optimization,
                &fixtures::optimized_plan_json("₹9,00,000"),
            )
            .with_success(
                GenerationPurpose::FinalBlueprint,
                &fixtures::final_blueprint_text(),
            )
            .with_success(GenerationPurpose::Assessment, &fixtures::report_json(true))
            .build()
    }

    #[tokio::test]
    async fn test_within_budget_skips_optimization() {
        let (runner, mock) = runner(scripted("₹8,00,000"));
        let snapshot = runner.run("a quiet village").await.unwrap();

        assert_eq!(snapshot.stage, Stage::Evaluated);
        assert!(!snapshot.over_budget);
        assert!(snapshot.optimized_plan.is_none());
        assert!(mock.calls_for(GenerationPurpose::Optimization).is_empty());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_over_budget_runs_every_step() {
        let (runner, mock) = runner(scripted("₹15,00,000"));
        let snapshot = runner.run("a busy port").await.unwrap();

        assert_eq!(snapshot.stage, Stage::Evaluated);
        assert!(snapshot.over_budget);
        assert!(snapshot.optimized_plan.is_some());
        assert!(snapshot.final_blueprint.is_some());
        let purposes: Vec<_> = mock.calls().into_iter().map(|c| c.purpose).collect();
        assert_eq!(
            purposes,
            vec![
                GenerationPurpose::InitialPlan,
                GenerationPurpose::Optimization,
                GenerationPurpose::FinalBlueprint,
                GenerationPurpose::Assessment,
            ]
        );
    }

    #[tokio::test]
    async fn test_exactly_at_limit_is_within_budget() {
        let (runner, mock) = runner(scripted("₹10,00,000"));
        let snapshot = runner.run("town").await.unwrap();
        assert!(!snapshot.over_budget);
        assert!(mock.calls_for(GenerationPurpose::Optimization).is_empty());
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let (runner, mock) = runner(
            MockGenerationClient::builder()
                .with_error(GenerationPurpose::InitialPlan, "quota exceeded")
                .build(),
        );
        let snapshot = runner.run("town").await.unwrap();
        assert_eq!(snapshot.stage, Stage::Error);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_flags_disable_steps() {
        let (runner, mock) = runner(scripted("₹15,00,000"));
        let runner = runner.with_optimization(false).with_assessment(false);
        let snapshot = runner.run("town").await.unwrap();
        assert_eq!(snapshot.stage, Stage::Done);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_runner_can_be_reused() {
        let (runner, _) = runner(scripted("₹15,00,000"));
        let runner = runner.with_assessment(false);
        runner.run("first town").await.unwrap();
        let snapshot = runner.run("second town").await.unwrap();
        assert_eq!(snapshot.description, "second town");
        assert_eq!(snapshot.stage, Stage::Finalized);
    }

    #[tokio::test]
    async fn test_blank_description_is_rejected() {
        let (runner, _) = runner(scripted("₹1"));
        assert!(matches!(runner.run(" ").await, Err(Error::Validation(_))));
    }
}
