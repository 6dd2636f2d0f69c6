use crate::domain::error::NlqError;
use crate::domain::model::{ExecutionContext, ExecutionResult, ModelReply, PromptContext};
use crate::domain::query::Operation;
use async_trait::async_trait;

/// Trait for text-generation backends
///
/// One call per translation. Implementations never retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the instructions plus the trimmed question, return the raw answer text
    async fn send(&self, prompt: &PromptContext, question: &str) -> Result<ModelReply, NlqError>;
}

/// Trait for whatever owns the current schema
///
/// Must return non-empty text; the returned string is a snapshot.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn schema_text(&self) -> Result<String, NlqError>;
}

/// Trait for lookup tables injected into the prompt (e.g. school codes)
///
/// The text is trusted verbatim.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn reference_text(&self) -> Result<Option<String>, NlqError>;
}

/// Trait for executing a parsed operation against the schema
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn execute(&self, operation: &Operation, context: &ExecutionContext) -> ExecutionResult;
}
