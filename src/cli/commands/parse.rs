//! `cityforge parse`
//!
//! Runs the text extractor on saved model output without calling the model.

use crate::extract::{parse_final_blueprint, parse_grand_total, parse_initial_plan};
use crate::generation::prompt::format_inr;
use crate::pipeline::{exceeds_budget, BUDGET_LIMIT};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

pub async fn run_parse_command(file: &Path, final_blueprint: bool, json: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let output = if final_blueprint {
        parse_final(&text, json)?
    } else {
        parse_plan(&text, json)?
    };
    print!("{output}");
    Ok(())
}

fn parse_plan(text: &str, json: bool) -> Result<String> {
    let plan = parse_initial_plan(text);
    let grand_total = parse_grand_total(&plan.costing);
    let over_budget = exceeds_budget(grand_total);

    if json {
        let value = json!({
            "plan": plan,
            "grandTotal": grand_total,
            "budgetLimit": BUDGET_LIMIT,
            "overBudget": over_budget,
        });
        return Ok(format!("{}\n", serde_json::to_string_pretty(&value)?));
    }

    Ok(format!(
        "## Raw Materials\n{}\n\n## Cost Estimate\n{}\n\n## ASCII Blueprint\n{}\n\n## SVG Blueprint\n{}\n\nGrand total: ₹{} ({})\n",
        plan.raw_materials,
        plan.costing,
        plan.ascii_blueprint,
        plan.svg_blueprint.as_unsanitized_str(),
        format_inr(grand_total),
        if over_budget { "over budget" } else { "within budget" },
    ))
}

fn parse_final(text: &str, json: bool) -> Result<String> {
    let blueprint = parse_final_blueprint(text);
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&blueprint)?));
    }
    Ok(format!(
        "## Final Blueprint\n{}\n\n## Plan Comparison\n{}\n",
        blueprint.blueprint, blueprint.comparison
    ))
}
