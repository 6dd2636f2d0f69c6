use crate::application::translate::Translator;
use crate::domain::error::NlqError;
use crate::infrastructure::config::Config;
use crate::infrastructure::engine::MemoryEngine;
use crate::infrastructure::network::client::OpenAiClient;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::reference::StaticReference;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<MemoryEngine>,
    pub translator: Translator,
}

impl AppState {
    pub fn new(
        config: Config,
        engine: MemoryEngine,
        reference: Option<StaticReference>,
    ) -> Result<Self, NlqError> {
        let http_client = create_client(Duration::from_secs(config.llm.timeout_secs))?;
        let model = OpenAiClient::new(http_client, &config.llm, config.llm.resolved_api_key());

        let engine = Arc::new(engine);
        let mut translator = Translator::new(Arc::new(model), engine.clone(), engine.clone());
        if let Some(reference) = reference {
            translator = translator.with_reference(Arc::new(reference));
        }

        Ok(Self {
            config: Arc::new(config),
            engine,
            translator,
        })
    }
}
