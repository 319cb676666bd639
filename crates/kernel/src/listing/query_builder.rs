//! Listing query builder using SeaQuery.
//!
//! Generates PostgreSQL for a [`ListQuery`]: projected columns, ANDed
//! comparison filters, ordered sorts, and LIMIT/OFFSET pagination.

use sea_query::{
    Alias, Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr, Value,
};

use super::types::{FilterOperator, ListFilter, ListQuery, PageRequest, SortDirection};
use crate::resources::FieldValue;

/// Query builder for listing queries.
pub struct ListQueryBuilder<'a> {
    query: &'a ListQuery,
}

impl<'a> ListQueryBuilder<'a> {
    pub fn new(query: &'a ListQuery) -> Self {
        Self { query }
    }

    /// Build the SELECT for one page.
    pub fn build(&self, page: PageRequest) -> String {
        self.build_window(page.offset(), u64::from(page.limit))
    }

    /// Build the SELECT for an explicit offset/limit window.
    pub fn build_window(&self, offset: u64, limit: u64) -> String {
        let mut select = Query::select();

        self.add_select_columns(&mut select);
        select.from(Alias::new(&self.query.table));
        self.add_filters(&mut select);
        self.add_sorts(&mut select);

        select.limit(limit);
        select.offset(offset);

        select.to_string(PostgresQueryBuilder)
    }

    /// Build a COUNT query over the filtered set.
    pub fn build_count(&self) -> String {
        let mut select = Query::select();

        select.expr(Expr::col(Asterisk).count());
        select.from(Alias::new(&self.query.table));
        self.add_filters(&mut select);

        select.to_string(PostgresQueryBuilder)
    }

    fn add_select_columns(&self, select: &mut SelectStatement) {
        for column in &self.query.columns {
            select.column((Alias::new(&self.query.table), Alias::new(column)));
        }
    }

    fn add_filters(&self, select: &mut SelectStatement) {
        for filter in &self.query.filters {
            select.and_where(self.filter_condition(filter));
        }
    }

    fn filter_condition(&self, filter: &ListFilter) -> SimpleExpr {
        let column = Expr::col((Alias::new(&self.query.table), Alias::new(&filter.field)));
        let value = sql_value(&filter.value);

        match filter.operator {
            FilterOperator::Equals => column.eq(value),
            FilterOperator::GreaterThan => column.gt(value),
            FilterOperator::GreaterOrEqual => column.gte(value),
            FilterOperator::LessThan => column.lt(value),
            FilterOperator::LessOrEqual => column.lte(value),
        }
    }

    fn add_sorts(&self, select: &mut SelectStatement) {
        for sort in &self.query.sorts {
            let order = match sort.direction {
                SortDirection::Asc => Order::Asc,
                SortDirection::Desc => Order::Desc,
            };
            select.order_by((Alias::new(&self.query.table), Alias::new(&sort.field)), order);
        }
    }
}

/// Convert a coerced value into a SQL literal.
///
/// Dates are rendered as ISO strings, which PostgreSQL casts implicitly when
/// compared against `date`/`timestamp` columns.
fn sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(i) => (*i).into(),
        FieldValue::Decimal(f) => (*f).into(),
        FieldValue::Text(s) => s.clone().into(),
        FieldValue::Date(d) => d.format("%Y-%m-%d").to_string().into(),
        FieldValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string().into(),
        FieldValue::Boolean(b) => (*b).into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::listing::types::ListSort;
    use chrono::NaiveDate;

    fn flats_query() -> ListQuery {
        ListQuery {
            table: "flats".to_string(),
            columns: vec!["id".to_string(), "address".to_string()],
            filters: Vec::new(),
            sorts: Vec::new(),
        }
    }

    #[test]
    fn simple_query_build() {
        let query = flats_query();
        let sql = ListQueryBuilder::new(&query).build(PageRequest { page: 1, limit: 5 });

        assert!(sql.contains("FROM \"flats\""), "{sql}");
        assert!(sql.contains("\"flats\".\"id\""), "{sql}");
        assert!(sql.contains("LIMIT 5"), "{sql}");
        assert!(sql.contains("OFFSET 0"), "{sql}");
        assert!(!sql.contains("WHERE"), "no filters means no WHERE: {sql}");
        assert!(!sql.contains("ORDER BY"), "no sorts means natural order: {sql}");
    }

    #[test]
    fn pagination_offset() {
        let query = flats_query();
        let sql = ListQueryBuilder::new(&query).build(PageRequest { page: 2, limit: 3 });
        assert!(sql.contains("LIMIT 3"), "{sql}");
        assert!(sql.contains("OFFSET 3"), "{sql}");
    }

    #[test]
    fn count_query_build() {
        let mut query = flats_query();
        query.sorts.push(ListSort {
            field: "id".to_string(),
            direction: SortDirection::Desc,
        });
        let sql = ListQueryBuilder::new(&query).build_count();

        assert!(sql.contains("COUNT(*)"), "{sql}");
        assert!(sql.contains("FROM \"flats\""), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
        assert!(!sql.contains("ORDER BY"), "{sql}");
    }

    #[test]
    fn filter_operators() {
        let mut query = flats_query();
        query.filters = vec![
            ListFilter {
                field: "id".to_string(),
                operator: FilterOperator::GreaterOrEqual,
                value: FieldValue::Integer(5),
            },
            ListFilter {
                field: "id".to_string(),
                operator: FilterOperator::LessOrEqual,
                value: FieldValue::Integer(10),
            },
            ListFilter {
                field: "address".to_string(),
                operator: FilterOperator::Equals,
                value: FieldValue::Text("Main St".to_string()),
            },
        ];
        let sql = ListQueryBuilder::new(&query).build(PageRequest { page: 1, limit: 5 });

        assert!(sql.contains("\"flats\".\"id\" >= 5"), "{sql}");
        assert!(sql.contains("\"flats\".\"id\" <= 10"), "{sql}");
        assert!(sql.contains("\"flats\".\"address\" = 'Main St'"), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn text_values_are_escaped() {
        let mut query = flats_query();
        query.filters.push(ListFilter {
            field: "address".to_string(),
            operator: FilterOperator::Equals,
            value: FieldValue::Text("O'Brien'; DROP TABLE flats; --".to_string()),
        });
        let sql = ListQueryBuilder::new(&query).build_count();

        assert!(!sql.contains("O'Brien';"), "quote must be escaped: {sql}");
    }

    #[test]
    fn date_values_render_iso() {
        let mut query = flats_query();
        query.filters.push(ListFilter {
            field: "sign_date".to_string(),
            operator: FilterOperator::LessThan,
            value: FieldValue::Date(NaiveDate::from_ymd_opt(2020, 10, 26).unwrap()),
        });
        let sql = ListQueryBuilder::new(&query).build_count();

        assert!(sql.contains("< '2020-10-26'"), "{sql}");
    }

    #[test]
    fn datetime_values_keep_fractional_seconds() {
        let created = NaiveDate::from_ymd_opt(2020, 11, 2)
            .unwrap()
            .and_hms_milli_opt(9, 0, 0, 250)
            .unwrap();
        let mut query = flats_query();
        query.filters.push(ListFilter {
            field: "created".to_string(),
            operator: FilterOperator::GreaterThan,
            value: FieldValue::DateTime(created),
        });
        let sql = ListQueryBuilder::new(&query).build_count();
        assert!(sql.contains("> '2020-11-02 09:00:00.250'"), "{sql}");

        query.filters[0].value = FieldValue::DateTime(created.date().and_hms_opt(9, 0, 0).unwrap());
        let sql = ListQueryBuilder::new(&query).build_count();
        assert!(sql.contains("> '2020-11-02 09:00:00'"), "{sql}");
    }

    #[test]
    fn sorts_in_order() {
        let mut query = flats_query();
        query.sorts = vec![
            ListSort {
                field: "address".to_string(),
                direction: SortDirection::Asc,
            },
            ListSort {
                field: "id".to_string(),
                direction: SortDirection::Desc,
            },
        ];
        let sql = ListQueryBuilder::new(&query).build(PageRequest { page: 1, limit: 5 });

        assert!(
            sql.contains("ORDER BY \"flats\".\"address\" ASC, \"flats\".\"id\" DESC"),
            "{sql}"
        );
    }
}
