//! Text extraction for free-form generation output
//!
//! The initial-plan and final-blueprint steps return a single Markdown blob.
//! This module splits it into fields by heading and derives the grand total
//! from the costing table. Extraction never fails: a missing heading
//! degrades to a per-field sentinel string.

pub mod grand_total;
pub mod sections;

pub use grand_total::parse_grand_total;
pub use sections::{extract_sections, Section, FINAL_BLUEPRINT_SECTIONS, INITIAL_PLAN_SECTIONS};

use crate::markup::UntrustedMarkup;
use serde::{Deserialize, Serialize};

/// Fields extracted from the initial plan text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPlan {
    pub raw_materials: String,
    pub costing: String,
    pub ascii_blueprint: String,
    pub svg_blueprint: UntrustedMarkup,
}

impl ParsedPlan {
    /// Whether the costing section was found.
    pub fn has_costing(&self) -> bool {
        self.costing != sections::COST_ESTIMATE.sentinel
    }
}

/// Fields extracted from the final blueprint text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalBlueprint {
    pub blueprint: String,
    pub comparison: String,
}

pub fn parse_initial_plan(text: &str) -> ParsedPlan {
    let [raw_materials, costing, ascii_blueprint, svg_blueprint] =
        extract_sections(text, &INITIAL_PLAN_SECTIONS);

    ParsedPlan {
        raw_materials,
        costing,
        ascii_blueprint,
        svg_blueprint: UntrustedMarkup::new(svg_blueprint),
    }
}

pub fn parse_final_blueprint(text: &str) -> FinalBlueprint {
    let [blueprint, comparison] = extract_sections(text, &FINAL_BLUEPRINT_SECTIONS);

    FinalBlueprint {
        blueprint,
        comparison,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial_plan_fields() {
        let text = "## Raw Materials\n- Bricks\n## Cost Estimate\nGrand Total: ₹5,00,000\n## ASCII Blueprint\n[H]\n## SVG Blueprint\n<svg/>";
        let plan = parse_initial_plan(text);
        assert_eq!(plan.raw_materials, "- Bricks");
        assert_eq!(plan.costing, "Grand Total: ₹5,00,000");
        assert_eq!(plan.ascii_blueprint, "[H]");
        assert_eq!(plan.svg_blueprint.as_unsanitized_str(), "<svg/>");
        assert!(plan.has_costing());
        assert_eq!(parse_grand_total(&plan.costing), 500000.0);
    }

    #[test]
    fn test_parse_initial_plan_unparseable() {
        let plan = parse_initial_plan("The model ignored the format.");
        assert_eq!(plan.raw_materials, "Could not parse raw materials.");
        assert_eq!(plan.costing, "Could not parse cost estimate.");
        assert_eq!(plan.ascii_blueprint, "Could not parse ASCII blueprint.");
        assert_eq!(
            plan.svg_blueprint.as_unsanitized_str(),
            "Could not parse SVG blueprint."
        );
        assert!(!plan.has_costing());
        assert_eq!(parse_grand_total(&plan.costing), 0.0);
    }

    #[test]
    fn test_parse_final_blueprint() {
        let text = "## Final Blueprint\n[=]\n\n## Plan Comparison\nTwo fewer commercial blocks.";
        let parsed = parse_final_blueprint(text);
        assert_eq!(parsed.blueprint, "[=]");
        assert_eq!(parsed.comparison, "Two fewer commercial blocks.");
    }
}
