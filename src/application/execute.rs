use crate::domain::error::NlqError;
use crate::domain::model::{ExecutionContext, TranslationOutcome};
use crate::domain::query::parse_operation;
use crate::domain::traits::QueryEngine;
use tracing::{debug, warn};

/// Parse, check and execute an extracted query.
///
/// Parse failures and non-read operations never reach the engine and come back
/// as `TranslationFailure`. Engine errors come back as `QueryErrors` in the
/// order the engine reported them; otherwise the engine's data is returned as is.
pub async fn run(query_text: &str, engine: &dyn QueryEngine) -> TranslationOutcome {
    let operation = match parse_operation(query_text) {
        Ok(op) => op,
        Err(e @ NlqError::Parse { .. }) => {
            debug!(error = %e, "extracted query failed to parse");
            return TranslationOutcome::failure(e.to_string());
        }
        Err(e) => return TranslationOutcome::failure(e.to_string()),
    };

    if !operation.kind.is_read_only() {
        warn!(kind = %operation.kind, "rejected non-read operation from model");
        return TranslationOutcome::failure(format!(
            "only read queries are permitted, model produced a {}",
            operation.kind
        ));
    }

    let result = engine
        .execute(&operation, &ExecutionContext::neutral())
        .await;

    if !result.errors.is_empty() {
        debug!(count = result.errors.len(), "engine reported query errors");
        return TranslationOutcome::QueryErrors(result.errors);
    }

    match result.data {
        Some(data) => TranslationOutcome::Data(data),
        None => TranslationOutcome::failure("query engine returned neither data nor errors"),
    }
}
