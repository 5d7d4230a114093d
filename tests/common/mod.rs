//! Common test utilities and helpers

#![allow(dead_code)]

use cityforge::generation::{GenerationPurpose, PlanGenerator};
use cityforge::testing::{fixtures, MockGenerationClient, MockGenerationClientBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Mock scripted with a successful response for every step.
pub fn scripted_client(grand_total: &str) -> MockGenerationClientBuilder {
    MockGenerationClient::builder()
        .with_success(GenerationPurpose::InitialPlan, &fixtures::plan_text(grand_total))
        .with_success(
            GenerationPurpose::Optimization,
            &fixtures::optimized_plan_json("₹9,40,000"),
        )
        .with_success(
            GenerationPurpose::FinalBlueprint,
            &fixtures::final_blueprint_text(),
        )
        .with_success(GenerationPurpose::Assessment, &fixtures::report_json(true))
}

pub fn generator(mock: MockGenerationClient) -> (Arc<PlanGenerator>, Arc<MockGenerationClient>) {
    let mock = Arc::new(mock);
    let generator = Arc::new(PlanGenerator::new(mock.clone()).expect("templates compile"));
    (generator, mock)
}

/// Write a config file into a fresh temp dir.
pub fn config_file(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cityforge.toml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}
