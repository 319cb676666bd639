#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] mounts the real listing pipeline and token checks behind a
//! small axum router, backed by in-memory fixtures instead of PostgreSQL.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, header};
use axum::response::Response;
use axum::routing::get;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use myrent_kernel::auth::{AccountKind, TokenService};
use myrent_kernel::error::{AppError, AppResult};
use myrent_kernel::listing::{
    ListParams, ListPipeline, ListResponse, ListingConfig, MemoryListExecutor, RouteLinks,
};
use myrent_kernel::resources::ResourceRegistry;

pub const SECRET: &[u8] = b"integration-test-secret-key-0123456789";

struct TestState {
    registry: ResourceRegistry,
    pipeline: ListPipeline,
    tables: HashMap<String, MemoryListExecutor>,
    tokens: TokenService,
}

/// A router serving `GET /api/v1/{resource}` for landlords.
pub struct TestApp {
    router: Router,
    tokens: TokenService,
}

impl TestApp {
    pub fn new(tables: Vec<(&str, Vec<Value>)>) -> Self {
        Self::with_config(ListingConfig::default(), tables)
    }

    pub fn with_config(config: ListingConfig, tables: Vec<(&str, Vec<Value>)>) -> Self {
        let registry = ResourceRegistry::builtin();
        let links = RouteLinks::for_registry("v1", &registry);
        let tokens = TokenService::new(SECRET, 30).unwrap();

        let state = Arc::new(TestState {
            pipeline: ListPipeline::new(config, Arc::new(links)),
            registry,
            tables: tables
                .into_iter()
                .map(|(name, rows)| (name.to_string(), MemoryListExecutor::new(rows)))
                .collect(),
            tokens: tokens.clone(),
        });

        let router = Router::new()
            .route("/api/v1/{resource}", get(list_resource))
            .with_state(state);

        Self { router, tokens }
    }

    /// A valid bearer header for an account.
    pub fn bearer(&self, id: i64, kind: AccountKind) -> String {
        format!("Bearer {}", self.tokens.issue(id, kind).unwrap())
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET `uri` as landlord 1.
    pub async fn get_as_landlord(&self, uri: &str) -> Response {
        let request = Request::get(uri)
            .header(header::AUTHORIZATION, self.bearer(1, AccountKind::Landlords))
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }
}

async fn list_resource(
    State(state): State<Arc<TestState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    params: ListParams,
) -> AppResult<ListResponse> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    state
        .tokens
        .require(authorization, Some(AccountKind::Landlords))?;

    let resource = state
        .registry
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Resource {name} not found")))?;
    let executor = state
        .tables
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Resource {name} not found")))?;

    let page = state
        .pipeline
        .run(resource.as_ref(), executor, &params, &resource.endpoint())
        .await?;

    Ok(page.into())
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
