//! Filter and sort clause construction.
//!
//! Translates request parameters into [`ListFilter`] and [`ListSort`] values
//! for a given resource. Anything that does not resolve to a declared field,
//! or whose value the resource refuses to coerce, is dropped without failing
//! the request; the dropped keys are returned for diagnostics.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::params::ListParams;
use super::types::{
    DropReason, DroppedParam, FilterOperator, ListFilter, ListSort, RESERVED_PARAMS,
    SortDirection,
};
use crate::resources::Resource;

/// Parameter names carrying a comparison suffix, e.g. `id[gte]`.
///
/// Anchored at the end deliberately: with trailing text after the suffix
/// (`id[gte]x`) the whole name is taken as the field, which is then dropped
/// as unknown.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static COMPARISON_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\[(gte|lte|gt|lt)\]$").expect("valid regex literal"));

/// Prefix marking a descending sort key.
const DESC_PREFIX: char = '-';

/// Split a parameter name into field and operator.
///
/// Names without a recognised suffix compare for equality on the whole name.
pub fn parse_filter_key(key: &str) -> (&str, FilterOperator) {
    if let Some(caps) = COMPARISON_PARAM.captures(key)
        && let (Some(field), Some(op)) = (caps.get(1), caps.get(2))
        && let Some(operator) = FilterOperator::from_suffix(op.as_str())
    {
        return (field.as_str(), operator);
    }
    (key, FilterOperator::Equals)
}

/// Build the filter clauses for `resource` from request parameters.
///
/// The returned clauses are ANDed by the executor. No recognised parameter
/// yields an empty list, i.e. no filtering.
pub fn build_filters(
    resource: &dyn Resource,
    params: &ListParams,
) -> (Vec<ListFilter>, Vec<DroppedParam>) {
    let mut filters = Vec::new();
    let mut dropped = Vec::new();

    for (key, raw) in params.iter() {
        if RESERVED_PARAMS.contains(&key) {
            continue;
        }

        let (name, operator) = parse_filter_key(key);

        let Some(field) = resource.field(name) else {
            debug!(resource = resource.name(), key, "ignoring unknown filter field");
            dropped.push(DroppedParam {
                key: key.to_string(),
                reason: DropReason::UnknownField,
            });
            continue;
        };

        let Some(value) = resource.coerce(field, raw) else {
            debug!(
                resource = resource.name(),
                key,
                value = raw,
                "ignoring filter value rejected by coercion"
            );
            dropped.push(DroppedParam {
                key: key.to_string(),
                reason: DropReason::InvalidValue,
            });
            continue;
        };

        filters.push(ListFilter {
            field: field.name.to_string(),
            operator,
            value,
        });
    }

    (filters, dropped)
}

/// Build the sort keys for `resource` from the `sort` parameter.
///
/// `sort` is a comma-separated list of field names, each optionally prefixed
/// with `-` for descending order. Keys keep their left-to-right order.
pub fn build_sorts(
    resource: &dyn Resource,
    params: &ListParams,
) -> (Vec<ListSort>, Vec<DroppedParam>) {
    let mut sorts = Vec::new();
    let mut dropped = Vec::new();

    let Some(spec) = params.get("sort") else {
        return (sorts, dropped);
    };

    for segment in spec.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (name, direction) = match segment.strip_prefix(DESC_PREFIX) {
            Some(rest) => (rest, SortDirection::Desc),
            None => (segment, SortDirection::Asc),
        };

        match resource.field(name) {
            Some(field) => sorts.push(ListSort {
                field: field.name.to_string(),
                direction,
            }),
            None => {
                debug!(resource = resource.name(), key = segment, "ignoring unknown sort field");
                dropped.push(DroppedParam {
                    key: segment.to_string(),
                    reason: DropReason::UnknownSortField,
                });
            }
        }
    }

    (sorts, dropped)
}

/// Resolve the `fields` parameter to the visible fields to return.
///
/// Unknown names are ignored. When nothing valid remains, every visible
/// field is returned.
pub fn build_projection(resource: &dyn Resource, params: &ListParams) -> Vec<String> {
    let requested: Vec<String> = params
        .get("fields")
        .map(|spec| {
            spec.split(',')
                .map(str::trim)
                .filter_map(|name| resource.field(name))
                .map(|f| f.name.to_string())
                .collect()
        })
        .unwrap_or_default();

    if requested.is_empty() {
        resource
            .visible_fields()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        requested
    }
}
