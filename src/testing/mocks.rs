//! Mock generation client

use crate::error::{Error, Result};
use crate::generation::{GenerationClient, GenerationPurpose, GenerationRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Holds calls open until the test releases them.
///
/// Each call that reaches the gate signals `entered` once and then waits for
/// one `release`.
#[derive(Debug)]
pub struct CallGate {
    entered: Semaphore,
    released: Semaphore,
}

impl Default for CallGate {
    fn default() -> Self {
        Self {
            entered: Semaphore::new(0),
            released: Semaphore::new(0),
        }
    }
}

impl CallGate {
    /// Wait until a call has reached the gate.
    pub async fn wait_entered(&self) {
        if let Ok(permit) = self.entered.acquire().await {
            permit.forget();
        }
    }

    /// Let one parked call through.
    pub fn release(&self) {
        self.released.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.add_permits(1);
        if let Ok(permit) = self.released.acquire().await {
            permit.forget();
        }
    }
}

/// Builder for creating configured mock generation clients
#[derive(Default)]
pub struct MockGenerationClientBuilder {
    responses: HashMap<GenerationPurpose, std::result::Result<String, String>>,
    gates: HashMap<GenerationPurpose, Arc<CallGate>>,
}

impl MockGenerationClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_success(mut self, purpose: GenerationPurpose, response: &str) -> Self {
        self.responses.insert(purpose, Ok(response.to_string()));
        self
    }

    pub fn with_error(mut self, purpose: GenerationPurpose, error: &str) -> Self {
        self.responses.insert(purpose, Err(error.to_string()));
        self
    }

    /// Park every call for `purpose` on `gate`.
    pub fn with_gate(mut self, purpose: GenerationPurpose, gate: Arc<CallGate>) -> Self {
        self.gates.insert(purpose, gate);
        self
    }

    pub fn build(self) -> MockGenerationClient {
        MockGenerationClient {
            responses: self.responses,
            gates: self.gates,
            calls: Mutex::new(Vec::new()),
        }
    }
}

/// Mock implementation of GenerationClient for testing
///
/// Purposes without a scripted response fail as an unreachable backend.
pub struct MockGenerationClient {
    responses: HashMap<GenerationPurpose, std::result::Result<String, String>>,
    gates: HashMap<GenerationPurpose, Arc<CallGate>>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerationClient {
    pub fn builder() -> MockGenerationClientBuilder {
        MockGenerationClientBuilder::new()
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, purpose: GenerationPurpose) -> Vec<GenerationRequest> {
        self.calls()
            .into_iter()
            .filter(|call| call.purpose == purpose)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(gate) = self.gates.get(&request.purpose) {
            gate.pass().await;
        }

        match self.responses.get(&request.purpose) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(Error::External(message.clone())),
            None => Err(Error::External(format!(
                "No mock response for {}",
                request.purpose
            ))),
        }
    }
}
