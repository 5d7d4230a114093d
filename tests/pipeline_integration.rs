//! End-to-end pipeline tests against a scripted generation client

mod common;

use cityforge::generation::GenerationPurpose;
use cityforge::pipeline::{ErrorStage, PlanOrchestrator, PlanRunner, Stage, Transition};
use cityforge::testing::{fixtures, MockGenerationClient};
use common::{generator, scripted_client};

#[tokio::test]
async fn test_coastal_town_over_budget() {
    let (generator, mock) = generator(scripted_client("₹12,34,567.50").build());
    let orchestrator = PlanOrchestrator::new(generator);

    orchestrator.start("a small coastal town").await.unwrap();
    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(snapshot.stage, Stage::Done);
    assert_eq!(snapshot.grand_total, 1_234_567.5);
    assert!(snapshot.over_budget);

    let plan = snapshot.plan.unwrap();
    assert_eq!(plan.raw_materials, fixtures::RAW_MATERIALS);
    assert!(plan.costing.starts_with("| Material | Quantity |"));
    assert!(plan.costing.ends_with("Grand Total: ₹12,34,567.50"));
    assert_eq!(plan.ascii_blueprint, fixtures::ASCII_BLUEPRINT);
    assert_eq!(
        plan.svg_blueprint.as_unsanitized_str(),
        fixtures::SVG_BLUEPRINT
    );

    assert_eq!(
        orchestrator.optimize().await.unwrap(),
        Transition::Applied(Stage::Optimized)
    );
    let optimization = &mock.calls_for(GenerationPurpose::Optimization)[0];
    assert!(optimization.prompt.contains("Grand Total: ₹12,34,567.50"));
    assert!(optimization.prompt.contains("₹10,00,000"));

    assert_eq!(
        orchestrator.evaluate().await.unwrap(),
        Transition::Applied(Stage::Evaluated)
    );
    let report = orchestrator
        .snapshot()
        .await
        .unwrap()
        .environmental_report
        .unwrap();
    assert!(report.optimized_plan_analysis.is_some());
}

#[tokio::test]
async fn test_missing_svg_heading_degrades_one_field() {
    let text = fixtures::plan_text("₹4,00,000").replace("## SVG Blueprint", "### Vector art");
    let (generator, _) = generator(
        MockGenerationClient::builder()
            .with_success(GenerationPurpose::InitialPlan, &text)
            .build(),
    );
    let orchestrator = PlanOrchestrator::new(generator);
    orchestrator.start("village").await.unwrap();

    let plan = orchestrator.snapshot().await.unwrap().plan.unwrap();
    assert_eq!(
        plan.svg_blueprint.as_unsanitized_str(),
        "Could not parse SVG blueprint."
    );
    assert_eq!(plan.raw_materials, fixtures::RAW_MATERIALS);
    assert!(plan.ascii_blueprint.starts_with(fixtures::ASCII_BLUEPRINT));
}

#[tokio::test]
async fn test_runner_reports_assessment_failure() {
    let (generator, _) = generator(
        scripted_client("₹6,00,000")
            .with_error(GenerationPurpose::Assessment, "deadline exceeded")
            .build(),
    );
    let snapshot = PlanRunner::new(generator).run("river town").await.unwrap();

    assert_eq!(snapshot.stage, Stage::Error);
    let error = snapshot.error.unwrap();
    assert_eq!(error.stage, ErrorStage::Evaluation);
    assert_eq!(error.message, "Failed to generate the environmental report.");
    assert!(snapshot.plan.is_some());
}

#[tokio::test]
async fn test_snapshot_json_shape() {
    let (generator, _) = generator(scripted_client("₹15,00,000").build());
    let snapshot = PlanRunner::new(generator).run("port city").await.unwrap();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["stage"], "evaluated");
    assert_eq!(json["overBudget"], true);
    assert_eq!(json["svgBlueprint"]["trusted"], false);
    assert!(json["optimizedPlan"]["optimizedCosting"].is_string());
    assert!(json["finalBlueprint"]["comparison"].is_string());
    assert_eq!(
        json["environmentalReport"]["originalPlanAnalysis"]["greenScore"],
        42.0
    );
    assert!(json["updatedAt"].is_string());
}
