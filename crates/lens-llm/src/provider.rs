//! Narrative generator trait definition

use crate::Result;
use async_trait::async_trait;

/// A request for generated prose
#[derive(Debug, Clone)]
pub struct NarrativeRequest {
    /// Fully rendered prompt text
    pub prompt: String,
    /// Sampling temperature, when the backend supports one
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<usize>,
}

impl NarrativeRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Trait for narrative-generation backends
///
/// Implementations turn a structured text prompt into generated prose.
/// Output is not guaranteed to be deterministic across calls.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Generate prose for the given request
    async fn generate(&self, request: NarrativeRequest) -> Result<String>;

    /// Backend name (e.g., "openai")
    fn name(&self) -> &str;
}
