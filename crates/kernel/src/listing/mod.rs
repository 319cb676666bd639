//! Collection listing module.
//!
//! This module provides:
//! - ListParams: the request's query parameters
//! - Filter/sort/projection builders driven by a `Resource`
//! - ListQueryBuilder: SeaQuery-based SQL generation
//! - ListExecutor: Postgres and in-memory executors
//! - ListPipeline: filter, sort and paginate with page links

mod builder;
mod executor;
mod http;
mod links;
mod memory;
mod params;
mod pipeline;
mod query_builder;
pub mod types;

pub use builder::{build_filters, build_projection, build_sorts, parse_filter_key};
pub use executor::{ListExecutor, PgListExecutor};
pub use http::ListResponse;
pub use links::{LinkBuilder, RouteLinks};
pub use memory::MemoryListExecutor;
pub use params::ListParams;
pub use pipeline::{ListPipeline, ListPlan, ListingError};
pub use query_builder::ListQueryBuilder;
pub use types::{
    DropReason, DroppedParam, FilterOperator, ListFilter, ListPage, ListQuery, ListSort,
    ListingConfig, PageRequest, Pagination, SortDirection,
};
