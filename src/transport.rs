//! HTTP transport used by the model client.
//!
//! The model adapters build requests and parse replies; actually moving
//! bytes over the network is delegated to an `HttpTransport`. The real
//! implementation wraps a `reqwest::Client`. No timeout is set here, so
//! requests inherit the client's defaults.

use async_trait::async_trait;

use crate::error::AnalyzerError;

/// A JSON POST request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    /// Extra headers; `Content-Type: application/json` is always sent
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    /// URL safe to show in logs and errors (credentials removed)
    pub display_url: String,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform exactly one POST round trip.
    ///
    /// Any status code is a successful exchange; only failures before a
    /// status arrives are errors.
    async fn post_json(&self, request: HttpRequest) -> Result<HttpReply, AnalyzerError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpReply, AnalyzerError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header("Content-Type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // reqwest errors may echo the full URL, which can carry the API key.
        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transport {
                target: request.display_url.clone(),
                reason: error_chain(&e.without_url()),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| AnalyzerError::Transport {
            target: request.display_url.clone(),
            reason: format!("failed to read response body: {}", error_chain(&e.without_url())),
        })?;

        Ok(HttpReply { status, body })
    }
}

/// Render an error together with its `source()` chain, outermost first.
///
/// reqwest's own message is only the outer layer ("error sending request");
/// the actionable cause sits further down the chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut last = message.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !last.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        last = text;
        source = cause.source();
    }
    message
}
