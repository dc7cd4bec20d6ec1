//! Blocking HTTP helpers shared by the exchange sources.
use std::time::Duration;

use log::debug;
use quote_core::{QuoteError, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Request};

const USER_AGENT: &str = concat!("quote_client/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed request.
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body as text.
    pub body: String,
}

/// Builds the client used for every exchange request.
pub fn client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| QuoteError::Http(format!("failed to build HTTP client: {}", e)))
}

/// Builds a GET request for `url`; query values are percent-encoded.
pub fn request(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<Request> {
    client
        .get(url)
        .query(query)
        .build()
        .map_err(|e| QuoteError::Http(e.to_string()))
}

/// Sends a GET request and reads the whole body.
pub fn get(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<Response> {
    let request = request(client, url, query)?;
    let target = request.url().clone();
    debug!("GET {}", target);
    let resp = client
        .execute(request)
        .map_err(|e| QuoteError::Http(e.to_string()))?;
    let status = resp.status();
    let body = resp.text().map_err(|e| QuoteError::Http(e.to_string()))?;
    debug!("GET {} -> {}", target, status);
    Ok(Response { status, body })
}
