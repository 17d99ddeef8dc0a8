// trolley_core/examples/rest_wiring.rs
//
// Shows the seam between the REST client and the host's HTTP stack: a
// Transport that logs what it would send and serves canned storefront
// responses, standing in for reqwest/hyper/whatever the application uses.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::info;
use trolley::{ApiRequest, ApiResponse, Credentials, Reconciler, RestCartStore, Transport, TrolleyError};

// 1. The Transport implementation. A real one delegates to an HTTP client
//    and returns whatever status/body came back; errors are reserved for
//    calls that never reached the server.
struct CannedTransport {
  responses: Mutex<VecDeque<ApiResponse>>,
}

impl CannedTransport {
  fn new(responses: Vec<ApiResponse>) -> Arc<Self> {
    Arc::new(CannedTransport {
      responses: Mutex::new(responses.into()),
    })
  }
}

#[async_trait]
impl Transport for CannedTransport {
  async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse> {
    info!(
      "wire: {} {} (auth: {})",
      request.method,
      request.url,
      if request.header("Authorization").is_some() { "bearer" } else { "api-key only" }
    );
    if let Some(body) = &request.body {
      info!("wire: body {}", body);
    }
    self
      .responses
      .lock()
      .pop_front()
      .ok_or_else(|| anyhow::anyhow!("no canned response left"))
  }
}

#[tokio::main]
async fn main() -> Result<(), TrolleyError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- REST Wiring Example ---");

  // 2. Responses in the storefront envelope, in the order the engine will
  //    ask for them: match fetch, add, refresh.
  let transport = CannedTransport::new(vec![
    ApiResponse::new(200, r#"{"code":"200","status":"OK","message":"Cart fetched","data":[]}"#),
    ApiResponse::new(
      200,
      r#"{"code":"200","status":"OK","message":"Item added","data":{"id":"c-301","activityId":"act-17","quantity":1}}"#,
    ),
    ApiResponse::new(
      200,
      r#"{"code":"200","status":"OK","message":"Cart fetched","data":[{"id":"c-301","activityId":"act-17","quantity":1,"activity":{"id":"act-17","title":"Sunrise Hike"}}]}"#,
    ),
  ]);

  // 3. Credentials are explicit constructor state. Omit the bearer token and
  //    the Authorization header disappears from every request.
  let credentials = Credentials::new("demo-api-key").with_bearer_token("demo-session-token");
  let store = RestCartStore::new(transport, "https://api.example.test/", credentials);
  info!("Client rooted at {}", store.base_url());

  // 4. The engine drives the client exactly like any other CartStore.
  let engine = Reconciler::new(Arc::new(store));
  let outcome = engine.add_delta("act-17", 1).await?;
  info!("Reconciled: {:?}", outcome);

  let snapshot = engine.view().snapshot();
  assert_eq!(snapshot.len(), 1);
  info!(
    "View now shows {} row(s), {} unit(s).",
    snapshot.len(),
    snapshot.total_quantity()
  );

  Ok(())
}
