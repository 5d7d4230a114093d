//! Plan pipeline state machine
//!
//! ```text
//! initial -> loading -> done -> optimizing -> optimized -> finalizing -> finalized
//!                         \                        \                         |
//!                          `-----------------------`--> evaluating -> evaluated
//! any in-flight stage --(generation failure)--> error
//! ```
//!
//! Every step after `start` is triggered explicitly. A transition marks the
//! state as in flight, releases the lock while the generation call runs, then
//! reacquires it to apply the result. Results are only applied to the run
//! that issued the call; a `start` or `reset` in between supersedes it.
//!
//! The generation call and the write-back run on a spawned task. A caller
//! that stops waiting detaches from the call without cancelling it, so an
//! in-flight stage always resolves.

use super::state::{ErrorStage, PipelineState, PlanSnapshot, Stage};
use super::BUDGET_LIMIT;
use crate::error::{Error, Result};
use crate::extract::{parse_final_blueprint, parse_grand_total, parse_initial_plan};
use crate::generation::{AssessmentRequest, FinalizeRequest, OptimizationRequest, PlanGenerator};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Outcome of a transition whose preconditions held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The result was applied; the pipeline is now in this stage.
    Applied(Stage),
    /// The pipeline was reset or restarted while the call was in flight, so
    /// the result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct Slot {
    /// Incremented whenever the state is replaced or discarded.
    run: u64,
    state: Option<PipelineState>,
}

/// Drives one plan through the generation steps.
///
/// Owns exactly one [`PipelineState`]. Generation failures never escape a
/// transition: they move the state to [`Stage::Error`] and keep everything
/// accumulated so far. `Err` is returned only when a transition's
/// preconditions do not hold, in which case nothing changes.
pub struct PlanOrchestrator {
    generator: Arc<PlanGenerator>,
    slot: Arc<Mutex<Slot>>,
}

impl PlanOrchestrator {
    pub fn new(generator: Arc<PlanGenerator>) -> Self {
        Self {
            generator,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Discard any existing state and generate a new initial plan.
    ///
    /// Accepted when no plan exists or the current one has reached
    /// `evaluated` or `error`. A plan in progress must be reset first.
    pub async fn start(&self, description: &str) -> Result<Transition> {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(Error::Validation(
                "City description must not be empty".to_string(),
            ));
        }

        let run = {
            let mut slot = self.slot.lock().await;
            if let Some(state) = &slot.state {
                if state.stage.is_in_flight() {
                    return Err(busy(state.stage));
                }
                if state.stage != Stage::Initial && !state.stage.is_terminal() {
                    return Err(Error::InvalidTransition(format!(
                        "Cannot start a new plan from stage '{}'; reset first",
                        state.stage
                    )));
                }
            }
            let mut state = PipelineState::new(description.clone());
            state.enter(Stage::Loading);
            slot.run += 1;
            slot.state = Some(state);
            slot.run
        };

        info!(run, "Generating initial plan");
        let generator = self.generator.clone();
        self.spawn_step(
            run,
            async move {
                generator
                    .generate_initial_plan(&description, BUDGET_LIMIT)
                    .await
            },
            move |state, result| match result {
                Ok(text) => {
                    let plan = parse_initial_plan(&text);
                    state.grand_total = parse_grand_total(&plan.costing);
                    state.plan = Some(plan);
                    state.enter(Stage::Done);
                    info!(
                        run,
                        grand_total = state.grand_total,
                        over_budget = state.is_over_budget(),
                        "Initial plan ready"
                    );
                }
                Err(e) => {
                    warn!(run, "Initial plan failed: {}", e);
                    state.fail(ErrorStage::Initial, e.to_string());
                }
            },
        )
        .await
    }

    /// Ask for a costing that fits the budget. Requires a finished initial
    /// plan with a cost estimate.
    pub async fn optimize(&self) -> Result<Transition> {
        let (run, request) = self
            .begin(Stage::Optimizing, |state| {
                require_stage(state, &[Stage::Done], "optimize")?;
                let costing = state.original_costing().ok_or_else(|| {
                    Error::InvalidTransition(
                        "Cannot optimize: the cost estimate could not be parsed".to_string(),
                    )
                })?;
                Ok(OptimizationRequest {
                    original_costing: costing.to_string(),
                    budget_limit: BUDGET_LIMIT,
                })
            })
            .await?;

        info!(run, "Optimizing plan cost");
        let generator = self.generator.clone();
        self.spawn_step(
            run,
            async move { generator.optimize_cost(&request).await },
            move |state, result| match result {
                Ok(optimized) => {
                    state.optimized = Some(optimized);
                    state.enter(Stage::Optimized);
                }
                Err(e) => {
                    warn!(run, "Optimization failed: {}", e);
                    state.fail(ErrorStage::Optimization, e.to_string());
                }
            },
        )
        .await
    }

    /// Generate the final blueprint and comparison for an optimized plan.
    pub async fn finalize(&self) -> Result<Transition> {
        let (run, request) = self
            .begin(Stage::Finalizing, |state| {
                require_stage(state, &[Stage::Optimized], "finalize")?;
                let optimized = state.optimized.as_ref().ok_or_else(|| {
                    Error::InvalidTransition("Cannot finalize: no optimized plan".to_string())
                })?;
                Ok(FinalizeRequest {
                    city_description: state.description.clone(),
                    optimization_explanation: optimized.explanation.clone(),
                })
            })
            .await?;

        info!(run, "Generating final blueprint");
        let generator = self.generator.clone();
        self.spawn_step(
            run,
            async move { generator.generate_final_blueprint(&request).await },
            move |state, result| match result {
                Ok(text) => {
                    state.final_blueprint = Some(parse_final_blueprint(&text));
                    state.enter(Stage::Finalized);
                }
                Err(e) => {
                    warn!(run, "Final blueprint failed: {}", e);
                    state.fail(ErrorStage::Finalization, e.to_string());
                }
            },
        )
        .await
    }

    /// Assess the environmental impact of whichever costings exist.
    pub async fn evaluate(&self) -> Result<Transition> {
        let (run, request) = self
            .begin(Stage::Evaluating, |state| {
                require_stage(
                    state,
                    &[Stage::Done, Stage::Optimized, Stage::Finalized],
                    "evaluate",
                )?;
                Ok(AssessmentRequest {
                    city_plan_description: state.description.clone(),
                    original_costing: state.original_costing().map(str::to_string),
                    optimized_costing: state.optimized.as_ref().map(|o| o.optimized_costing.clone()),
                })
            })
            .await?;

        info!(
            run,
            with_optimized = request.optimized_costing.is_some(),
            "Assessing environmental impact"
        );
        let generator = self.generator.clone();
        self.spawn_step(
            run,
            async move { generator.assess_environmental_impact(&request).await },
            move |state, result| match result {
                Ok(report) => {
                    state.report = Some(report);
                    state.enter(Stage::Evaluated);
                }
                Err(e) => {
                    warn!(run, "Environmental assessment failed: {}", e);
                    state.fail(ErrorStage::Evaluation, e.to_string());
                }
            },
        )
        .await
    }

    /// Drop the current state. Any call still in flight will have its
    /// result discarded.
    pub async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        slot.run += 1;
        if let Some(state) = slot.state.take() {
            info!(run = slot.run, from = %state.stage, "Pipeline reset");
        }
    }

    pub async fn snapshot(&self) -> Option<PlanSnapshot> {
        self.slot.lock().await.state.as_ref().map(PipelineState::snapshot)
    }

    pub async fn stage(&self) -> Option<Stage> {
        self.slot.lock().await.state.as_ref().map(|s| s.stage)
    }

    /// Check preconditions, build the step input, and mark the state as in
    /// flight, all under one lock.
    async fn begin<T>(
        &self,
        in_flight: Stage,
        prepare: impl FnOnce(&PipelineState) -> Result<T>,
    ) -> Result<(u64, T)> {
        let mut slot = self.slot.lock().await;
        let run = slot.run;
        let state = slot
            .state
            .as_mut()
            .ok_or_else(|| Error::InvalidTransition("No plan has been started".to_string()))?;

        let input = prepare(state)?;
        state.enter(in_flight);
        Ok((run, input))
    }

    /// Run the generation call and its write-back on a detached task and wait
    /// for the outcome. Dropping the returned future does not stop the task.
    async fn spawn_step<T, F, A>(&self, run: u64, call: F, apply: A) -> Result<Transition>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
        A: FnOnce(&mut PipelineState, Result<T>) + Send + 'static,
    {
        let slot = self.slot.clone();
        let task = tokio::spawn(async move {
            let result = call.await;
            complete(&slot, run, |state| apply(state, result)).await
        });

        match task.await {
            Ok(transition) => Ok(transition),
            Err(e) => {
                // The task panicked; the stage cannot be trusted any more.
                self.fail_run(run, e.to_string()).await;
                Err(Error::External(format!("Generation task failed: {e}")))
            }
        }
    }

    async fn fail_run(&self, run: u64, message: String) {
        let mut slot = self.slot.lock().await;
        if slot.run != run {
            return;
        }
        if let Some(state) = slot.state.as_mut() {
            let stage = match state.stage {
                Stage::Loading => ErrorStage::Initial,
                Stage::Optimizing => ErrorStage::Optimization,
                Stage::Finalizing => ErrorStage::Finalization,
                Stage::Evaluating => ErrorStage::Evaluation,
                _ => return,
            };
            state.fail(stage, message);
        }
    }
}

async fn complete(
    slot: &Mutex<Slot>,
    run: u64,
    apply: impl FnOnce(&mut PipelineState),
) -> Transition {
    let mut slot = slot.lock().await;
    if slot.run != run {
        debug!(run, current = slot.run, "Discarding result for superseded run");
        return Transition::Superseded;
    }

    match slot.state.as_mut() {
        Some(state) => {
            apply(state);
            Transition::Applied(state.stage)
        }
        None => Transition::Superseded,
    }
}

fn busy(stage: Stage) -> Error {
    Error::InvalidTransition(format!("A generation step is already running ({stage})"))
}

fn require_stage(state: &PipelineState, allowed: &[Stage], action: &str) -> Result<()> {
    if state.stage.is_in_flight() {
        return Err(busy(state.stage));
    }
    if !allowed.contains(&state.stage) {
        return Err(Error::InvalidTransition(format!(
            "Cannot {action} from stage '{}'",
            state.stage
        )));
    }
    Ok(())
}
