//! HTTP glue for listing endpoints.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use super::params::ListParams;
use super::types::{ListPage, Pagination};

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ListParams::from_query(parts.uri.query().unwrap_or_default()))
    }
}

/// JSON envelope for collection listings.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<serde_json::Value>,
    pub number_of_records: usize,
    pub pagination: Pagination,
}

impl From<ListPage> for ListResponse {
    fn from(page: ListPage) -> Self {
        Self {
            success: true,
            number_of_records: page.items.len(),
            data: page.items,
            pagination: page.pagination,
        }
    }
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
