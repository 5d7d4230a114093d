//! Testing utilities and fixtures
//!
//! Provides a scripted [`GenerationClient`](crate::generation::GenerationClient)
//! and canned model output for exercising the pipeline without network access.

pub mod fixtures;
pub mod mocks;

pub use mocks::{CallGate, MockGenerationClient, MockGenerationClientBuilder};
