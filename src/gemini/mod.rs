//! Generative model access.
//!
//! Flows talk to the model through the [`GenerativeModel`] trait so the
//! Vertex client can be swapped for a scripted model in tests.

mod client;
mod types;

pub use client::VertexClient;
pub use types::{
    Candidate, Content, FunctionCall, FunctionDeclaration, FunctionResponse,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleSearch,
    GoogleSearchRetrieval, Part, Tool,
};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for generative model backends.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one `generateContent` call.
    async fn generate_content(&self, request: GenerateContentRequest)
        -> Result<GenerateContentResponse>;
}
