// trolley_core/src/store/rest.rs

//! `RestCartStore`: the storefront REST dialect for the four cart
//! primitives.
//!
//! Every method is one fresh round trip; nothing is cached between calls.
//! Responses arrive in the storefront envelope `{code, status, message,
//! data}`; only `data` carries payload, and `message` is folded into
//! transport errors when a call fails.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{event, instrument, Level};

use crate::error::{StoreOp, TrolleyError, TrolleyResult};
use crate::models::{ActivityId, CartRow, RowId};
use crate::store::transport::{ApiRequest, ApiResponse, Credentials, Method, Transport};
use crate::store::CartStore;

/// The storefront response wrapper. Unknown fields are ignored; a missing or
/// null `data` is legal and means "no payload".
#[derive(Debug, Deserialize)]
struct Envelope<D> {
  #[serde(default)]
  message: Option<String>,
  data: Option<D>,
}

/// The remote-facing cart client, generic over the injected [`Transport`].
///
/// Holds only constructor state. Cart state lives on the server and in the
/// engine's view, never here.
pub struct RestCartStore<T: Transport> {
  transport: Arc<T>,
  base_url: String,
  credentials: Credentials,
}

impl<T: Transport> RestCartStore<T> {
  /// A client for the cart collection rooted at `base_url` (any trailing
  /// slash is dropped), authenticating every call with `credentials`.
  pub fn new(transport: Arc<T>, base_url: impl Into<String>, credentials: Credentials) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    RestCartStore {
      transport,
      base_url,
      credentials,
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiRequest {
    let mut headers = vec![
      ("Content-Type".to_string(), "application/json".to_string()),
      ("apiKey".to_string(), self.credentials.api_key.clone()),
    ];
    if let Some(token) = &self.credentials.bearer_token {
      headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
    }
    ApiRequest {
      method,
      url: format!("{}{}", self.base_url, path),
      headers,
      body,
    }
  }

  async fn dispatch(&self, op: StoreOp, request: ApiRequest) -> TrolleyResult<ApiResponse> {
    event!(Level::DEBUG, %op, method = %request.method, url = %request.url, "Dispatching cart call.");
    self
      .transport
      .send(request)
      .await
      .map_err(|source| TrolleyError::Transport { op, source })
  }
}

/// Failure for a non-2xx status: prefer the envelope's `message`, fall back
/// to the bare status code.
fn status_failure(op: StoreOp, response: &ApiResponse) -> TrolleyError {
  let detail = serde_json::from_str::<Envelope<Value>>(&response.body)
    .ok()
    .and_then(|envelope| envelope.message);
  let source = match detail {
    Some(message) => anyhow::anyhow!("cart API returned status {}: {}", response.status, message),
    None => anyhow::anyhow!("cart API returned status {}", response.status),
  };
  TrolleyError::Transport { op, source }
}

fn decode<D: DeserializeOwned>(op: StoreOp, response: &ApiResponse) -> TrolleyResult<Envelope<D>> {
  serde_json::from_str(&response.body).map_err(|err| TrolleyError::Transport {
    op,
    source: anyhow::Error::new(err).context("malformed cart API response body"),
  })
}

#[async_trait]
impl<T: Transport> CartStore for RestCartStore<T> {
  #[instrument(name = "RestCartStore::list_rows", skip_all, err(Display))]
  async fn list_rows(&self) -> TrolleyResult<Vec<CartRow>> {
    let request = self.request(Method::Get, "/api/v1/carts", None);
    let response = self.dispatch(StoreOp::List, request).await?;
    if !response.is_success() {
      return Err(status_failure(StoreOp::List, &response));
    }
    let envelope: Envelope<Vec<CartRow>> = decode(StoreOp::List, &response)?;
    // Null or absent `data` is an empty cart, not an error.
    let rows = envelope.data.unwrap_or_default();
    event!(Level::DEBUG, rows = rows.len(), "Cart listed.");
    Ok(rows)
  }

  #[instrument(name = "RestCartStore::add_row", skip_all, fields(activity = %activity), err(Display))]
  async fn add_row(&self, activity: &ActivityId) -> TrolleyResult<CartRow> {
    let body = json!({ "activityId": activity });
    let request = self.request(Method::Post, "/api/v1/add-cart", Some(body));
    let response = self.dispatch(StoreOp::Add, request).await?;
    if !response.is_success() {
      return Err(status_failure(StoreOp::Add, &response));
    }
    let envelope: Envelope<CartRow> = decode(StoreOp::Add, &response)?;
    match envelope.data {
      Some(row) => {
        event!(Level::DEBUG, row = %row.id, quantity = row.quantity, "Row created.");
        Ok(row)
      }
      None => Err(TrolleyError::Transport {
        op: StoreOp::Add,
        source: anyhow::anyhow!("add response carried no created row"),
      }),
    }
  }

  #[instrument(name = "RestCartStore::set_row_quantity", skip_all, fields(row = %row, quantity), err(Display))]
  async fn set_row_quantity(&self, row: &RowId, quantity: i32) -> TrolleyResult<()> {
    // Rejected locally: the dialect has no representation for a row at zero,
    // and letting it through would strand a phantom row server-side.
    if quantity < 1 {
      return Err(TrolleyError::InvalidQuantity { requested: quantity });
    }
    let body = json!({ "quantity": quantity });
    let request = self.request(Method::Post, &format!("/api/v1/update-cart/{}", row), Some(body));
    let response = self.dispatch(StoreOp::Update, request).await?;
    if response.status == 404 {
      return Err(TrolleyError::NotFound { row: row.clone() });
    }
    if !response.is_success() {
      return Err(status_failure(StoreOp::Update, &response));
    }
    Ok(())
  }

  #[instrument(name = "RestCartStore::remove_row", skip_all, fields(row = %row), err(Display))]
  async fn remove_row(&self, row: &RowId) -> TrolleyResult<()> {
    let request = self.request(Method::Delete, &format!("/api/v1/delete-cart/{}", row), None);
    let response = self.dispatch(StoreOp::Remove, request).await?;
    if response.status == 404 {
      return Err(TrolleyError::NotFound { row: row.clone() });
    }
    if !response.is_success() {
      return Err(status_failure(StoreOp::Remove, &response));
    }
    Ok(())
  }
}
