use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

/// A raw HTTP response: status plus the unparsed body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The wire boundary of the gateway.
///
/// The gateway's classification and retry logic is written against this
/// trait so tests can script status codes and failures without a server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// The production transport, backed by `reqwest`.
///
/// Carries the API key header on every request; all other authentication
/// material (timestamp, recvWindow, signature) travels in the query string
/// built by the gateway.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-MBX-APIKEY",
            HeaderValue::from_str(api_key)
                .map_err(|e| TransportError::Network(format!("invalid API key header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.post(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
