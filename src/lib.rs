//! Translate natural-language questions into read-only GraphQL queries with a
//! language model, then run them against a schema-bound query engine.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use application::translate::Translator;
pub use domain::error::NlqError;
pub use domain::model::{TranslationOutcome, TranslationRequest, TranslationResponse};
