//! Shared fakes and fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use nlq::domain::error::NlqError;
use nlq::domain::model::{ExecutionContext, ExecutionResult, ModelReply, PromptContext};
use nlq::domain::query::Operation;
use nlq::domain::traits::{ModelClient, QueryEngine, SchemaProvider};
use nlq::infrastructure::engine::{Dataset, MemoryEngine};
use nlq::Translator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DATASET: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/demos/campus_crime.json"
));

pub fn engine() -> MemoryEngine {
    let dataset: Dataset = serde_json::from_str(DATASET).expect("demo dataset parses");
    MemoryEngine::from_dataset(dataset).expect("demo dataset is valid")
}

type Responder = Box<dyn Fn() -> Result<ModelReply, NlqError> + Send + Sync>;

/// Model that replays a scripted answer and records what it was sent.
pub struct FakeModel {
    respond: Responder,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String)>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::with(move || {
            Ok(ModelReply {
                raw_text: text.clone(),
            })
        })
    }

    pub fn failing(make_error: fn() -> NlqError) -> Arc<Self> {
        Self::with(move || Err(make_error()))
    }

    fn with(respond: impl Fn() -> Result<ModelReply, NlqError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system instructions, user message) of the last call.
    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for FakeModel {
    async fn send(&self, prompt: &PromptContext, question: &str) -> Result<ModelReply, NlqError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() =
            Some((prompt.system_instructions.clone(), question.to_string()));
        (self.respond)()
    }
}

/// Wraps an engine and counts executions.
pub struct CountingEngine {
    inner: MemoryEngine,
    calls: AtomicUsize,
}

impl CountingEngine {
    pub fn new(inner: MemoryEngine) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryEngine for CountingEngine {
    async fn execute(&self, operation: &Operation, context: &ExecutionContext) -> ExecutionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(operation, context).await
    }
}

pub struct FixedSchema(pub Result<String, String>);

#[async_trait]
impl SchemaProvider for FixedSchema {
    async fn schema_text(&self) -> Result<String, NlqError> {
        self.0.clone().map_err(NlqError::Schema)
    }
}

/// Translator over the demo dataset with the given model.
pub fn translator(model: Arc<FakeModel>) -> (Translator, Arc<CountingEngine>) {
    let inner = engine();
    let schema = Arc::new(inner.clone());
    let engine = CountingEngine::new(inner);
    (Translator::new(model, schema, engine.clone()), engine)
}
