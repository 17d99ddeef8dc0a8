// trolley_core/src/store/transport.rs

//! The injected wire seam: one trait call per HTTP round trip.
//!
//! This crate never opens sockets itself. Whatever HTTP client the host
//! application already carries (with its own timeouts, retries, and token
//! refresh) implements [`Transport`]; the cart client assembles complete
//! requests and interprets statuses and bodies.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// The HTTP verbs the cart endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Delete,
}

impl Method {
  pub fn as_str(&self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Delete => "DELETE",
    }
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A fully assembled call: absolute URL, headers already in final form.
#[derive(Debug, Clone)]
pub struct ApiRequest {
  pub method: Method,
  pub url: String,
  /// Header name/value pairs, in the order they were attached.
  pub headers: Vec<(String, String)>,
  /// JSON body, for the endpoints that take one.
  pub body: Option<Value>,
}

impl ApiRequest {
  /// The first header with the given name, compared case-insensitively.
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(header, _)| header.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }
}

/// What came back: the status code and the raw body text, uninterpreted.
#[derive(Debug, Clone)]
pub struct ApiResponse {
  pub status: u16,
  pub body: String,
}

impl ApiResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    ApiResponse { status, body: body.into() }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Executes one request.
///
/// An `Err` here means the call never produced an HTTP status (DNS failure,
/// refused connection, timeout). Anything the server actually answered, 4xx
/// and 5xx included, comes back as an [`ApiResponse`] for the caller to
/// interpret.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
  async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse>;
}

/// Static credentials attached to every cart call.
///
/// These are handed over at construction; the client never reads ambient
/// session state, so two clients with different credentials can coexist in
/// one process.
#[derive(Debug, Clone)]
pub struct Credentials {
  /// The storefront API key, sent as the `apiKey` header.
  pub api_key: String,
  /// Session bearer token. When absent the `Authorization` header is omitted
  /// entirely rather than sent empty.
  pub bearer_token: Option<String>,
}

impl Credentials {
  pub fn new(api_key: impl Into<String>) -> Self {
    Credentials {
      api_key: api_key.into(),
      bearer_token: None,
    }
  }

  pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
    self.bearer_token = Some(token.into());
    self
  }
}
