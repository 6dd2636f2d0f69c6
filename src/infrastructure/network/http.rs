// HTTP client utilities
use crate::domain::error::NlqError;
use reqwest::Client;
use std::time::Duration;

/// Create the shared HTTP client.
///
/// `timeout` bounds the whole model call; hitting it surfaces as a transport error.
pub fn create_client(timeout: Duration) -> Result<Client, NlqError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!("nlq/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
