//! `cityforge plan`

use crate::app::build_generator;
use crate::config::PlannerConfig;
use crate::generation::prompt::format_inr;
use crate::generation::PlanAnalysis;
use crate::pipeline::{PlanRunner, PlanSnapshot, Stage};
use anyhow::Result;
use std::fmt::Write;

#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    pub optimize: bool,
    pub final_blueprint: bool,
    pub assess: bool,
    pub json: bool,
}

pub async fn run_plan_command(
    config: &PlannerConfig,
    description: &str,
    options: PlanOptions,
) -> Result<()> {
    let generator = build_generator(config)?;
    let runner = PlanRunner::new(generator)
        .with_optimization(options.optimize)
        .with_final_blueprint(options.final_blueprint)
        .with_assessment(options.assess);

    let snapshot = runner.run(description).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(&snapshot));
    }

    if snapshot.stage == Stage::Error {
        let message = snapshot
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "Plan generation failed".to_string());
        anyhow::bail!(message);
    }
    Ok(())
}

/// Human-readable rendering of a snapshot.
pub fn render_snapshot(snapshot: &PlanSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "City: {}", snapshot.description);
    let _ = writeln!(out, "Stage: {}", snapshot.stage);

    if let Some(plan) = &snapshot.plan {
        section(&mut out, "Raw Materials", &plan.raw_materials);
        section(&mut out, "Cost Estimate", &plan.costing);
        let _ = writeln!(
            out,
            "Grand total: ₹{} ({} the ₹{} budget)\n",
            format_inr(snapshot.grand_total),
            if snapshot.over_budget { "over" } else { "within" },
            format_inr(snapshot.budget_limit)
        );
        section(&mut out, "ASCII Blueprint", &plan.ascii_blueprint);
        section(
            &mut out,
            "SVG Blueprint (unsanitized)",
            plan.svg_blueprint.as_unsanitized_str(),
        );
    }

    if let Some(optimized) = &snapshot.optimized_plan {
        section(&mut out, "Optimized Costing", &optimized.optimized_costing);
        section(&mut out, "Optimization Notes", &optimized.explanation);
    }

    if let Some(blueprint) = &snapshot.final_blueprint {
        section(&mut out, "Final Blueprint", &blueprint.blueprint);
        section(&mut out, "Plan Comparison", &blueprint.comparison);
    }

    if let Some(report) = &snapshot.environmental_report {
        analysis(&mut out, "Original Plan", &report.original_plan_analysis);
        if let Some(optimized) = &report.optimized_plan_analysis {
            analysis(&mut out, "Optimized Plan", optimized);
        }
        section(&mut out, "Recommendation", &report.final_recommendation);
    }

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error during {}: {}", error.stage, error.message);
    }
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "\n## {title}\n{body}");
}

fn analysis(out: &mut String, title: &str, analysis: &PlanAnalysis) {
    let _ = writeln!(
        out,
        "\n## {title}: Green Score {}/100\nRisks: {}\nAlternatives: {}",
        analysis.green_score, analysis.environmental_risks, analysis.greener_alternatives
    );
}
