//! Request interception standing in for the backend.
//!
//! [`MockResponder`] sits where the HTTP transport would. Requests matching
//! the [`RouteTable`] are answered locally; everything else is forwarded to
//! the wrapped transport untouched.

pub mod fixtures;
pub mod routes;
pub mod sample;

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::consts::MOCK_LOAD_ERROR;
use crate::error::TransportError;
use crate::transport::{Request, Response, Transport};

pub use fixtures::{DirFixtures, EmbeddedFixtures, FixtureSource};
pub use routes::{Handler, RouteTable};
pub use sample::Sample;

pub struct MockResponder {
    routes: RouteTable,
    fixtures: Arc<dyn FixtureSource>,
    passthrough: Arc<dyn Transport>,
}

impl MockResponder {
    pub fn new(fixtures: Arc<dyn FixtureSource>, passthrough: Arc<dyn Transport>) -> Self {
        Self {
            routes: RouteTable::new(),
            fixtures,
            passthrough,
        }
    }

    /// Answer a request from the route table. `None` means no route matched
    /// and the request should bypass the responder.
    pub async fn handle(&self, request: &Request) -> Option<Response> {
        let path = request.route_path();
        let handler = self.routes.lookup(request.method, path)?;
        debug!(method = %request.method, path, "mock route matched");

        let response = match handler(self.fixtures.as_ref()).await {
            Ok(body) => Response::json(200, &body),
            Err(e) => {
                warn!(path, error = %e, "mock handler failed");
                Response::json(500, &json!({ "error": MOCK_LOAD_ERROR }))
            }
        };
        Some(response)
    }
}

#[async_trait]
impl Transport for MockResponder {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        match self.handle(request).await {
            Some(response) => Ok(response),
            None => {
                debug!(method = %request.method, path = %request.path, "bypassing mock responder");
                self.passthrough.send(request).await
            }
        }
    }
}
