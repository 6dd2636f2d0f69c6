use thiserror::Error;

#[derive(Error, Debug)]
pub enum NlqError {
    #[error("HTTP request error: {}", with_sources(.0))]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("credential not configured")]
    MissingCredential,

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model endpoint error: {0}")]
    Upstream(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Syntax error: {message} (line {line}, column {column})")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },
}

// reqwest keeps the cause (refused connection, DNS failure, timeout) in the source chain.
fn with_sources(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
