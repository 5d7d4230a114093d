//! # cityforge
//!
//! Turns a free-text city description into a costed plan through a chain of
//! generative model calls, optimizes it when it exceeds the budget, and
//! assesses its environmental impact.
//!
//! ## Usage
//!
//! ```bash
//! cityforge plan "a small coastal town with a harbour" [--no-optimize] [--json]
//! cityforge parse saved-output.md
//! cityforge serve --port 9002
//! ```
//!
//! ## Modules
//!
//! - `extract` - Heading-based section extraction and grand total parsing
//! - `generation` - Model client, prompt templates, output schemas and the generation steps
//! - `pipeline` - State machine sequencing the steps, with stale-response protection
//! - `server` - HTTP adapter with per-session pipelines
//! - `cli` - Command line interface
//! - `config` - Configuration file and environment handling
//! - `markup` - Wrapper for model-generated markup that has not been sanitized
//! - `testing` - Mock generation client and canned model output
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generation;
pub mod markup;
pub mod pipeline;
pub mod server;

pub mod testing;


pub use error::{Error, Result};
