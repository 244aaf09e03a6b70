use std::thread;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, warn};

use crate::config::{FetchConfig, RetryPolicy};
use crate::error::{FplError, Result};

pub fn http_client(cfg: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(cfg.timeout)
        .build()
        .map_err(|err| FplError::Config(format!("failed to build http client: {err}")))
}

/// Why a single attempt failed, and whether another attempt can help.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    Retryable(String),
    Fatal(String),
}

/// GET `url` and return the body. Transport errors, 5xx, 408 and 429 are
/// retried with exponential backoff; other statuses fail at once.
pub fn fetch_text(client: &Client, url: &str, retry: &RetryPolicy) -> Result<String> {
    let attempts = retry.attempts.max(1);
    let mut attempt = 0;

    let message = loop {
        attempt += 1;
        match fetch_once(client, url) {
            Ok(body) => {
                debug!(url, attempt, bytes = body.len(), "fetched");
                return Ok(body);
            }
            Err(Failure::Fatal(message)) => break message,
            Err(Failure::Retryable(message)) if attempt >= attempts => break message,
            Err(Failure::Retryable(message)) => {
                let delay = retry.backoff_after(attempt);
                warn!(url, attempt, error = %message, ?delay, "request failed, retrying");
                thread::sleep(delay);
            }
        }
    };

    Err(FplError::Network {
        url: url.to_string(),
        message: format!("{message} (after {attempt} attempts)"),
    })
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

fn fetch_once(client: &Client, url: &str) -> std::result::Result<String, Failure> {
    let resp = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .map_err(|err| Failure::Retryable(format!("request failed: {err}")))?;
    let status = resp.status();
    if !status.is_success() {
        let message = format!("http {status}");
        return Err(if is_retryable(status) {
            Failure::Retryable(message)
        } else {
            Failure::Fatal(message)
        });
    }
    resp.text()
        .map_err(|err| Failure::Retryable(format!("failed reading body: {err}")))
}
