//! Canned model output

use serde_json::json;

pub const RAW_MATERIALS: &str = "- Cement (Essential): 5,000 bags for foundations\n- Marble (Optional/Luxury): 200 slabs for the town hall";
pub const ASCII_BLUEPRINT: &str = "+----+----+\n| H  | P  |\n+----+----+";
pub const SVG_BLUEPRINT: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"40\" height=\"20\"><rect width=\"20\" height=\"20\"/></svg>";
pub const FINAL_ASCII_BLUEPRINT: &str = "+----+\n| H  |\n+----+";
pub const PLAN_COMPARISON: &str = "The optimized plan drops the marble facade and shrinks the stadium.";

/// Initial plan text with all four sections and the given grand total.
pub fn plan_text(grand_total: &str) -> String {
    format!(
        "Here is your plan.\n\n## Raw Materials\n{RAW_MATERIALS}\n\n## Cost Estimate\n| Material | Quantity | Unit Cost | Total Cost |\n|---|---|---|---|\n| Cement | 5,000 | ₹350 | ₹17,50,000 |\nSubtotal: ₹17,50,000\nGrand Total: {grand_total}\n\n## ASCII Blueprint\n{ASCII_BLUEPRINT}\n\n## SVG Blueprint\n{SVG_BLUEPRINT}\n"
    )
}

pub fn optimized_plan_json(grand_total: &str) -> String {
    json!({
        "optimizedCosting": format!("| Cement | 4,000 | ₹300 | ₹12,00,000 |\nGrand Total: {grand_total}"),
        "explanation": "Replaced marble with local stone and reduced cement quantities."
    })
    .to_string()
}

/// Environmental report, optionally including the optimized plan analysis.
pub fn report_json(with_optimized: bool) -> String {
    let mut report = json!({
        "originalPlanAnalysis": {
            "environmentalRisks": "High embodied carbon from cement and marble.",
            "greenScore": 42,
            "greenerAlternatives": "Fly-ash bricks and reclaimed stone."
        },
        "finalRecommendation": "Optimized"
    });
    if with_optimized {
        report["optimizedPlanAnalysis"] = json!({
            "environmentalRisks": "Moderate quarrying impact.",
            "greenScore": 67.5,
            "greenerAlternatives": "Rainwater harvesting on public buildings."
        });
    }
    report.to_string()
}

pub fn final_blueprint_text() -> String {
    format!("## Final Blueprint\n{FINAL_ASCII_BLUEPRINT}\n\n## Plan Comparison\n{PLAN_COMPARISON}\n")
}
