//! Listing pipeline: filter, sort, paginate.
//!
//! Stateless; every call works on one request's parameters and one
//! executor. Parameter problems never fail the request; only executor and
//! link-building failures surface as [`ListingError`].

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::builder::{build_filters, build_projection, build_sorts};
use super::executor::ListExecutor;
use super::links::LinkBuilder;
use super::params::ListParams;
use super::types::{
    DroppedParam, ListPage, ListQuery, ListingConfig, PageRequest, Pagination, total_pages,
};
use crate::resources::Resource;

/// Listing failures. Bad parameters are not errors.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The executor failed (connectivity, constraint, ...).
    #[error("query execution failed")]
    Execution(#[source] anyhow::Error),

    /// The link builder does not know the endpoint.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

/// A resolved listing request, before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPlan {
    pub query: ListQuery,
    pub page: PageRequest,
    pub dropped: Vec<DroppedParam>,
}

/// Turns listing requests into pages.
#[derive(Clone)]
pub struct ListPipeline {
    config: ListingConfig,
    links: Arc<dyn LinkBuilder>,
}

impl ListPipeline {
    pub fn new(config: ListingConfig, links: Arc<dyn LinkBuilder>) -> Self {
        Self { config, links }
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Resolve filters, sorts, projection and page for a request.
    pub fn plan(&self, resource: &dyn Resource, params: &ListParams) -> ListPlan {
        let (filters, mut dropped) = build_filters(resource, params);
        let (sorts, dropped_sorts) = build_sorts(resource, params);
        dropped.extend(dropped_sorts);

        ListPlan {
            query: ListQuery {
                table: resource.table().to_string(),
                columns: build_projection(resource, params),
                filters,
                sorts,
            },
            page: params.page_request(&self.config),
            dropped,
        }
    }

    /// Run a listing request against `executor`.
    ///
    /// `endpoint` is the logical name used to rebuild page links.
    pub async fn run(
        &self,
        resource: &dyn Resource,
        executor: &dyn ListExecutor,
        params: &ListParams,
        endpoint: &str,
    ) -> Result<ListPage, ListingError> {
        let plan = self.plan(resource, params);

        if !plan.dropped.is_empty() {
            debug!(
                resource = resource.name(),
                dropped = plan.dropped.len(),
                "listing parameters ignored"
            );
        }

        let total = executor
            .count(&plan.query)
            .await
            .map_err(ListingError::Execution)?;

        // Over-paging is not an error, there is just nothing to fetch.
        let items = if plan.page.offset() >= total {
            Vec::new()
        } else {
            executor
                .fetch(&plan.query, plan.page.offset(), u64::from(plan.page.limit))
                .await
                .map_err(ListingError::Execution)?
        };

        let dropped = if self.config.strict {
            plan.dropped
        } else {
            Vec::new()
        };
        let pagination = self.paginate(endpoint, params, plan.page, total, dropped)?;

        Ok(ListPage {
            items,
            request: plan.page,
            pagination,
        })
    }

    fn paginate(
        &self,
        endpoint: &str,
        params: &ListParams,
        page: PageRequest,
        total: u64,
        dropped_params: Vec<DroppedParam>,
    ) -> Result<Pagination, ListingError> {
        let total_pages = total_pages(total, page.limit);

        let next_page = if page.page < total_pages {
            Some(self.links.page_link(endpoint, params, page.page + 1)?)
        } else {
            None
        };
        let previous_page = if page.page > 1 {
            Some(self.links.page_link(endpoint, params, page.page - 1)?)
        } else {
            None
        };

        Ok(Pagination {
            total_pages,
            total_records: total,
            current_page: self.links.page_link(endpoint, params, page.page)?,
            next_page,
            previous_page,
            dropped_params,
        })
    }
}
