//! Page links for listing responses.

use std::collections::HashMap;

use super::ListingError;
use super::params::ListParams;
use crate::resources::ResourceRegistry;

/// Rebuilds a link to "this endpoint" with a different `page`.
pub trait LinkBuilder: Send + Sync {
    /// Link to `endpoint` carrying `params` with `page` substituted.
    fn page_link(
        &self,
        endpoint: &str,
        params: &ListParams,
        page: u32,
    ) -> Result<String, ListingError>;
}

/// Route table mapping logical endpoint names to paths under an API prefix.
#[derive(Debug, Clone, Default)]
pub struct RouteLinks {
    prefix: String,
    routes: HashMap<String, String>,
}

impl RouteLinks {
    /// Create an empty route table. `prefix` is prepended to every path
    /// (e.g. `/api/v1`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
            routes: HashMap::new(),
        }
    }

    /// Route table for every resource of `registry`, under `/api/<version>`.
    pub fn for_registry(api_version: &str, registry: &ResourceRegistry) -> Self {
        registry
            .iter()
            .fold(Self::new(format!("/api/{api_version}")), |links, r| {
                links.route(r.endpoint(), r.path())
            })
    }

    /// Register `endpoint` at `path`.
    pub fn route(mut self, endpoint: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(endpoint.into(), path.into());
        self
    }
}

impl LinkBuilder for RouteLinks {
    fn page_link(
        &self,
        endpoint: &str,
        params: &ListParams,
        page: u32,
    ) -> Result<String, ListingError> {
        let path = self
            .routes
            .get(endpoint)
            .ok_or_else(|| ListingError::UnknownEndpoint(endpoint.to_string()))?;

        Ok(format!(
            "{}{}?{}",
            self.prefix,
            path,
            params.with_page(page).to_query_string()
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_link_with_page_first() {
        let links = RouteLinks::new("/api/v1/").route("flats.list", "/flats");
        let params = ListParams::from_query("sort=-id&page=2&limit=3");

        let link = links.page_link("flats.list", &params, 3).unwrap();
        assert_eq!(link, "/api/v1/flats?page=3&sort=-id&limit=3");
    }

    #[test]
    fn link_without_other_params() {
        let links = RouteLinks::new("/api/v1").route("flats.list", "/flats");
        let link = links.page_link("flats.list", &ListParams::default(), 1).unwrap();
        assert_eq!(link, "/api/v1/flats?page=1");
    }

    #[test]
    fn encodes_bracketed_keys() {
        let links = RouteLinks::new("/api/v1").route("flats.list", "/flats");
        let params = ListParams::from_query("id[gte]=3");
        let link = links.page_link("flats.list", &params, 2).unwrap();
        assert_eq!(link, "/api/v1/flats?page=2&id%5Bgte%5D=3");
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let links = RouteLinks::new("/api/v1");
        let err = links
            .page_link("pictures.list", &ListParams::default(), 1)
            .unwrap_err();
        assert!(matches!(err, ListingError::UnknownEndpoint(ref e) if e == "pictures.list"));
    }

    #[test]
    fn registry_routes() {
        let links = RouteLinks::for_registry("v1", &ResourceRegistry::builtin());
        let link = links
            .page_link("settlements.list", &ListParams::default(), 1)
            .unwrap();
        assert_eq!(link, "/api/v1/settlements?page=1");
    }
}
