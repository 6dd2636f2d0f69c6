use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single natural-language question to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub question: String,
}

impl TranslationRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    /// Trimmed question text, or `None` when nothing is left.
    pub fn trimmed(&self) -> Option<&str> {
        let q = self.question.trim();
        if q.is_empty() {
            None
        } else {
            Some(q)
        }
    }
}

// Inbound wire form: { "query": "..." }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub query: String,
}

impl From<TranslateRequest> for TranslationRequest {
    fn from(req: TranslateRequest) -> Self {
        Self::new(req.query)
    }
}

/// Everything the model sees besides the question itself.
///
/// Built fresh for every request so schema or reference changes are picked up.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub system_instructions: String,
    pub schema_text: String,
    pub reference_data: Option<String>,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub raw_text: String,
}

/// The one candidate query found in a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuery {
    pub query: String,
}

/// Result of scanning a sanitized reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The model answered with the error marker; carries its stated reason.
    Refusal(String),
    Query(ExtractedQuery),
    NotFound,
}

/// Final result of one translation. Exactly one shape per request.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Data(Value),
    QueryErrors(Vec<String>),
    TranslationFailure(String),
}

impl TranslationOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::TranslationFailure(reason.into())
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

// Outbound wire form; the three fields never appear together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TranslationResponse {
    Data {
        data: Value,
    },
    Errors {
        errors: Vec<ErrorMessage>,
    },
    LlmError {
        #[serde(rename = "llmError")]
        llm_error: String,
    },
}

impl From<TranslationOutcome> for TranslationResponse {
    fn from(outcome: TranslationOutcome) -> Self {
        match outcome {
            TranslationOutcome::Data(data) => Self::Data { data },
            TranslationOutcome::QueryErrors(messages) => Self::Errors {
                errors: messages
                    .into_iter()
                    .map(|message| ErrorMessage { message })
                    .collect(),
            },
            TranslationOutcome::TranslationFailure(reason) => Self::LlmError { llm_error: reason },
        }
    }
}

/// Capabilities handed to the query engine. Model-generated queries always run
/// with no identity and no write access; the parser already refuses variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub allow_mutations: bool,
}

impl ExecutionContext {
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// What a query engine hands back: data, errors, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    pub data: Option<Value>,
    pub errors: Vec<String>,
}

impl ExecutionResult {
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<String>) -> Self {
        Self { data: None, errors }
    }
}
