use super::theme::Theme;
use crate::domain::model::TranslationOutcome;
use std::fmt::Write;

/// Human-readable rendering of an outcome.
pub fn format_outcome(question: &str, outcome: &TranslationOutcome, theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)(question.trim())).ok();
    writeln!(output, "{}", (theme.line)(&"⸺".repeat(40))).ok();

    match outcome {
        TranslationOutcome::Data(data) => {
            let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            for line in pretty.lines() {
                writeln!(output, "  {}", (theme.data)(line)).ok();
            }
        }
        TranslationOutcome::QueryErrors(errors) => {
            for (i, message) in errors.iter().enumerate() {
                writeln!(
                    output,
                    "  {}. {}",
                    (theme.idx)(&(i + 1).to_string()),
                    (theme.error)(message)
                )
                .ok();
            }
        }
        TranslationOutcome::TranslationFailure(reason) => {
            writeln!(output, "  {}", (theme.failure)(&format!("✘ {}", reason))).ok();
        }
    }

    output
}
