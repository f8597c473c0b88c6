use std::{sync::Arc, time::Duration};

use common::TransportError;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{trace, warn};

/// A single blocking GET, returning the response body as text.
///
/// Implementations must not retry: one failed attempt is one `TransportError`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        (**self).get(url, timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        (**self).get(url, timeout)
    }
}

/// `Transport` backed by a blocking reqwest client.
///
/// Must not be created or dropped from within an async runtime, see `reqwest::blocking`.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    reqwest_client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            reqwest_client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_client(reqwest_client: reqwest::blocking::Client) -> Self {
        Self { reqwest_client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        trace!("GET {} (timeout {:?})", url, timeout);

        let resp = self.reqwest_client
            .get(url)
            .header(USER_AGENT, concat!("pwned-validator/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "text/plain")
            .timeout(timeout)
            .send()
            .map_err(classify)?;

        // the body is what gets matched, whatever the status
        let status = resp.status();
        if !status.is_success() {
            warn!("range service responded with status code {}", status);
        }

        resp.text().map_err(classify)
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    let e = e.without_url();
    let msg = e.to_string();
    if e.is_timeout() {
        TransportError::Timeout(msg)
    } else if e.is_connect() {
        TransportError::Connect(msg)
    } else if e.is_body() || e.is_decode() {
        TransportError::Body(msg)
    } else {
        TransportError::Other(msg)
    }
}
