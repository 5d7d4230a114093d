//! Prompt templates for the plan generation steps

use super::steps::{AssessmentRequest, FinalizeRequest, OptimizationRequest};
use crate::error::Result;
use tera::{Context, Tera};

const INITIAL_PLAN: &str = "initial_plan";
const OPTIMIZATION: &str = "optimization";
const ASSESSMENT: &str = "assessment";
const FINAL_BLUEPRINT: &str = "final_blueprint";

const INITIAL_PLAN_TEMPLATE: &str = r#"As a Raw Material Supplier Bot and a Finance Manager Bot, analyze the following city plan description. Your task is to perform two main functions:

1.  **Raw Material Supply**:
    *   Identify all infrastructure components (e.g., buildings, roads, parks).
    *   List every necessary raw material.
    *   Provide estimated quantities.
    *   Categorize each material as 'Essential' or 'Optional/Luxury'.
    *   State the purpose of each material.

2.  **Initial Financial Analysis**:
    *   Assign realistic per-unit costs in Indian Rupees (₹) to each material.
    *   Create a costing table with columns: Material, Quantity, Unit Cost, and Total Cost.
    *   Calculate the Subtotal of all materials.
    *   Add a 10% contingency fee.
    *   Write the Grand Total on its own line as "Grand Total: ₹<amount>".
    *   Indicate the budget status: "Within Budget" or "Exceeds ₹{{ budget_limit }} Budget".

Additionally, draw the city layout twice: once as ASCII art and once as a single self-contained SVG document.

**Output Format**:
Your entire output must be a single Markdown string. Use exactly these headings, in this order:

## Raw Materials

[Your structured list of materials here]

## Cost Estimate

[Your cost table and summary here]

## ASCII Blueprint

[Your ASCII art blueprint here]

## SVG Blueprint

[Your SVG markup here]

**City Description to Analyze**:
{{ city_description }}
"#;

const OPTIMIZATION_TEMPLATE: &str = r#"You are an expert city planner tasked with optimizing a city plan to fit within a budget.

Original Plan Costing:
{{ original_costing }}

Budget Limit: ₹{{ budget_limit }}

Identify expensive optional/luxury materials and suggest affordable alternatives or quantity reductions to bring the total cost within the budget. Explain the changes made to the original plan.

Provide the optimized plan costing details, including a "Grand Total" line, and a clear explanation of the changes. Ensure the optimized total is within the budget.
"#;

const ASSESSMENT_TEMPLATE: &str = r#"You are an expert environmental analyst.

You will evaluate the environmental impact of a city plan based on its description, original costing, and optimized costing (if available).

For each plan (original{% if optimized_costing %} and optimized{% endif %}), identify environmental risks, provide a Green Score (0-100), and suggest eco-friendly alternatives.

Finally, recommend which plan is better overall: Original, Optimized, or a Hybrid approach.

City Plan Description: {{ city_plan_description }}
{% if original_costing %}
Original Costing:
{{ original_costing }}
{% endif %}{% if optimized_costing %}
Optimized Costing:
{{ optimized_costing }}
{% endif %}"#;

const FINAL_BLUEPRINT_TEMPLATE: &str = r#"As a Builder Bot, your task is to create the final city layout blueprint and provide a comparison summary.

The original city plan was described as:
---
{{ city_description }}
---

However, it was over budget and has been optimized. The following changes were made:
---
{{ optimization_explanation }}
---

Based on these changes, perform the following tasks:

1.  **Generate Final Blueprint**: Create a new, final ASCII art blueprint that reflects the optimizations.
2.  **Provide Comparison**: Write a short summary comparing the original plan to the optimized plan, explaining the differences (e.g., fewer commercial blocks, smaller stadium, use of different materials).

**Output Format**:
Your entire output must be a single Markdown string. Use exactly these headings, in this order:

## Final Blueprint

[Your new ASCII art blueprint here]

## Plan Comparison

[Your comparison summary here]
"#;

/// Renders the prompts for each generation step.
pub struct PromptEngine {
    tera: Tera,
}

impl PromptEngine {
    /// Create a new prompt engine with the built-in templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]); // Prompts are plain text

        tera.add_raw_templates(vec![
            (INITIAL_PLAN, INITIAL_PLAN_TEMPLATE),
            (OPTIMIZATION, OPTIMIZATION_TEMPLATE),
            (ASSESSMENT, ASSESSMENT_TEMPLATE),
            (FINAL_BLUEPRINT, FINAL_BLUEPRINT_TEMPLATE),
        ])?;

        Ok(Self { tera })
    }

    pub fn render_initial_plan(&self, city_description: &str, budget_limit: f64) -> Result<String> {
        let mut context = Context::new();
        context.insert("city_description", city_description);
        context.insert("budget_limit", &format_inr(budget_limit));
        Ok(self.tera.render(INITIAL_PLAN, &context)?)
    }

    pub fn render_optimization(&self, request: &OptimizationRequest) -> Result<String> {
        let mut context = Context::new();
        context.insert("original_costing", &request.original_costing);
        context.insert("budget_limit", &format_inr(request.budget_limit));
        Ok(self.tera.render(OPTIMIZATION, &context)?)
    }

    pub fn render_assessment(&self, request: &AssessmentRequest) -> Result<String> {
        let mut context = Context::new();
        context.insert("city_plan_description", &request.city_plan_description);
        context.insert("original_costing", &request.original_costing);
        context.insert("optimized_costing", &request.optimized_costing);
        Ok(self.tera.render(ASSESSMENT, &context)?)
    }

    pub fn render_final_blueprint(&self, request: &FinalizeRequest) -> Result<String> {
        let mut context = Context::new();
        context.insert("city_description", &request.city_description);
        context.insert("optimization_explanation", &request.optimization_explanation);
        Ok(self.tera.render(FINAL_BLUEPRINT, &context)?)
    }
}

/// Format a rupee amount with Indian digit grouping (12,34,567).
///
/// Fractions are rounded away; negative and non-finite amounts render as 0.
pub fn format_inr(amount: f64) -> String {
    let rounded = if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    };
    let digits = rounded.to_string();

    if digits.len() <= 3 {
        return digits;
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
