//! Command implementation modules

pub mod parse;
pub mod plan;
pub mod serve;

pub use parse::run_parse_command;
pub use plan::{run_plan_command, PlanOptions};
pub use serve::run_serve_command;
