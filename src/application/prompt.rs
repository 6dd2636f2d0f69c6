use crate::domain::model::PromptContext;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Prefix the model must use when it cannot answer.
pub const ERROR_MARKER: &str = "ERROR:";

const RULES: &str = r#"You translate questions about the data described by the schema below into GraphQL queries.

Respond with EXACTLY ONE of the following and nothing else:
1. A single valid GraphQL query against the schema below.
2. A single line starting with "ERROR: " followed by a short reason, when the question cannot be answered with this schema or is too ambiguous to answer.

Rules:
- Only read queries. Never write mutations or subscriptions.
- Do not use variables ($name). Write every value as a literal, e.g. schoolCode: "001775".
- Do not use fragments or directives.
- Only use types, fields and arguments that appear in the schema. Do not invent fields.
- When reference data is provided, use its exact codes as literal values instead of guessing.
- Resolve relative dates ("last 7 days", "this month") against the current time given below and write them as ISO 8601 literals.
- No explanations, no markdown commentary, no reasoning tags, no text before or after the query."#;

impl PromptContext {
    /// Assemble the system instructions for one request.
    ///
    /// `schema_text` must be non-empty; reference data, when present, is
    /// appended verbatim after a label.
    pub fn build(
        schema_text: impl Into<String>,
        reference_data: Option<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let schema_text = schema_text.into();
        let reference_data = reference_data.filter(|r| !r.trim().is_empty());

        let mut instructions = String::with_capacity(RULES.len() + schema_text.len() + 256);
        instructions.push_str(RULES);
        write!(
            instructions,
            "\n\nCurrent time (UTC): {}\n\nSCHEMA:\n{}\n",
            issued_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            schema_text.trim()
        )
        .ok();
        if let Some(reference) = &reference_data {
            write!(instructions, "\nREFERENCE DATA (JSON):\n{}\n", reference.trim()).ok();
        }

        Self {
            system_instructions: instructions,
            schema_text,
            reference_data,
            issued_at,
        }
    }
}
