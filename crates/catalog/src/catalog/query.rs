//! Catalog query construction using SeaQuery.
//!
//! One optional condition per filterable attribute, folded with AND via
//! `Cond::all()`: absent criteria contribute nothing, so the zero-filter
//! query is the full catalog. Produces the count, paged-select, price-bound
//! aggregate, and rating-aggregate-ordered variants the service executes.

use rust_decimal::Decimal;
use sea_query::{
    Alias, Asterisk, Cond, Expr, Func, JoinType, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr,
};

use super::criteria::ProductFilter;
use super::sort::SortDirection;
use crate::models::ProductRecord;

const PRODUCTS: &str = "products";
const CATEGORIES: &str = "categories";
const RATINGS: &str = "ratings";

/// Effective price bounds for a request, always within a satisfiable range
/// derived from the filtered catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceBounds {
    /// Clamp requested bounds into the observed range: a requested minimum
    /// that is absent or below the observed minimum becomes the observed
    /// minimum, and symmetrically for the maximum. The reported bounds thus
    /// always reflect the filtered universe, never a wider range.
    pub fn resolve(
        observed_min: Decimal,
        observed_max: Decimal,
        requested_min: Option<Decimal>,
        requested_max: Option<Decimal>,
    ) -> Self {
        let min = match requested_min {
            Some(m) if m >= observed_min => m,
            _ => observed_min,
        };
        let max = match requested_max {
            Some(m) if m <= observed_max => m,
            _ => observed_max,
        };

        Self { min, max }
    }
}

/// Builder for catalog product queries.
pub struct ProductQuery {
    filter: ProductFilter,
}

fn col(table: &str, column: &str) -> Expr {
    Expr::col((Alias::new(table), Alias::new(column)))
}

impl ProductQuery {
    /// Create a builder from raw criteria; normalization (trim, lowercase)
    /// happens here so every generated query sees canonical tokens.
    pub fn new(filter: ProductFilter) -> Self {
        Self {
            filter: filter.normalized(),
        }
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Case-insensitive membership test over a product column.
    fn membership(column: &str, values: &[String]) -> SimpleExpr {
        Expr::expr(Func::lower(col(PRODUCTS, column))).is_in(values.iter().cloned())
    }

    /// All active conditions except price. Absent criteria are neutral:
    /// they never appear in the composed condition.
    fn non_price_condition(&self) -> Cond {
        let mut cond = Cond::all();

        if let Some(ref name) = self.filter.name {
            let pattern = format!("%{}%", escape_like_wildcards(&name.to_lowercase()));
            cond = cond.add(Expr::expr(Func::lower(col(PRODUCTS, "name"))).like(pattern));
        }
        if !self.filter.brands.is_empty() {
            cond = cond.add(Self::membership("brand", &self.filter.brands));
        }
        if !self.filter.colors.is_empty() {
            cond = cond.add(Self::membership("color", &self.filter.colors));
        }
        if !self.filter.memories.is_empty() {
            cond = cond.add(Self::membership("memory", &self.filter.memories));
        }
        if !self.filter.screen_sizes.is_empty() {
            cond = cond.add(Self::membership("screen_size", &self.filter.screen_sizes));
        }
        if !self.filter.battery_capacities.is_empty() {
            cond = cond.add(Self::membership(
                "battery_capacity",
                &self.filter.battery_capacities,
            ));
        }
        if !self.filter.operating_systems.is_empty() {
            cond = cond.add(Self::membership(
                "operating_system",
                &self.filter.operating_systems,
            ));
        }
        if !self.filter.categories.is_empty() {
            // Matches through the product→category join, by name: callers
            // never need to know category ids.
            cond = cond.add(
                Expr::expr(Func::lower(col(CATEGORIES, "name")))
                    .is_in(self.filter.categories.iter().cloned()),
            );
        }

        cond
    }

    /// The full composed condition: every active filter plus the resolved
    /// price range.
    fn condition(&self, bounds: PriceBounds) -> Cond {
        self.non_price_condition()
            .add(col(PRODUCTS, "price").gte(Expr::val(bounds.min)))
            .add(col(PRODUCTS, "price").lte(Expr::val(bounds.max)))
    }

    /// Base SELECT of product columns joined with the category name.
    fn select_records(&self) -> SelectStatement {
        let mut query = Query::select();

        for column in ProductRecord::COLUMNS {
            query.column((Alias::new(PRODUCTS), Alias::new(*column)));
        }
        query.expr_as(col(CATEGORIES, "name"), Alias::new("category_name"));

        query.from(Alias::new(PRODUCTS));
        query.join(
            JoinType::InnerJoin,
            Alias::new(CATEGORIES),
            col(PRODUCTS, "category_id").equals((Alias::new(CATEGORIES), Alias::new("id"))),
        );

        query
    }

    /// Join categories on aggregate/count queries only when a category
    /// filter is active; the paged select always joins for projection.
    fn join_categories_if_filtering(&self, query: &mut SelectStatement) {
        if !self.filter.categories.is_empty() {
            query.join(
                JoinType::InnerJoin,
                Alias::new(CATEGORIES),
                col(PRODUCTS, "category_id").equals((Alias::new(CATEGORIES), Alias::new("id"))),
            );
        }
    }

    /// `SELECT MIN(price), MAX(price)` restricted by the non-price filters.
    pub fn price_bounds_sql(&self) -> String {
        let mut query = Query::select();
        query.expr(Func::min(col(PRODUCTS, "price")));
        query.expr(Func::max(col(PRODUCTS, "price")));
        query.from(Alias::new(PRODUCTS));
        self.join_categories_if_filtering(&mut query);
        query.cond_where(self.non_price_condition());

        query.to_string(PostgresQueryBuilder)
    }

    /// `SELECT COUNT(*)` over the fully filtered set.
    pub fn count_sql(&self, bounds: PriceBounds) -> String {
        let mut query = Query::select();
        query.expr(Expr::col(Asterisk).count());
        query.from(Alias::new(PRODUCTS));
        self.join_categories_if_filtering(&mut query);
        query.cond_where(self.condition(bounds));

        query.to_string(PostgresQueryBuilder)
    }

    /// One page, ordered by a stored column (pushdown sort). The id column
    /// is appended as a tie-break so repeated requests return identical
    /// orderings.
    pub fn page_sql(
        &self,
        bounds: PriceBounds,
        column: &str,
        direction: SortDirection,
        limit: u64,
        offset: u64,
    ) -> String {
        let mut query = self.select_records();
        query.cond_where(self.condition(bounds));
        query.order_by((Alias::new(PRODUCTS), Alias::new(column)), direction.order());
        if column != "id" {
            query.order_by((Alias::new(PRODUCTS), Alias::new("id")), Order::Asc);
        }
        query.limit(limit);
        query.offset(offset);

        query.to_string(PostgresQueryBuilder)
    }

    /// One page ordered by the derived average rating, pushed into the
    /// store: LEFT JOIN ratings, GROUP BY product, ORDER BY
    /// COALESCE(AVG(rating), 0). Unrated products sort as 0.
    pub fn rating_page_sql(
        &self,
        bounds: PriceBounds,
        direction: SortDirection,
        limit: u64,
        offset: u64,
    ) -> String {
        let mut query = self.select_records();
        query.join(
            JoinType::LeftJoin,
            Alias::new(RATINGS),
            col(PRODUCTS, "id").equals((Alias::new(RATINGS), Alias::new("product_id"))),
        );
        query.cond_where(self.condition(bounds));

        // products.id is the primary key, so grouping by it covers every
        // product column; the joined category name must be grouped itself.
        query.group_by_col((Alias::new(PRODUCTS), Alias::new("id")));
        query.group_by_col((Alias::new(CATEGORIES), Alias::new("name")));

        let average: SimpleExpr = Func::coalesce([
            Func::avg(col(RATINGS, "rating")).into(),
            Expr::val(0).into(),
        ])
        .into();
        query.order_by_expr(average, direction.order());
        query.order_by((Alias::new(PRODUCTS), Alias::new("id")), Order::Asc);
        query.limit(limit);
        query.offset(offset);

        query.to_string(PostgresQueryBuilder)
    }

    /// Every matching record in id order, unbounded by page size. Feeds the
    /// in-memory rating sort (id order is the tie-break input order) and the
    /// filter-options projection.
    pub fn all_sql(&self, bounds: PriceBounds) -> String {
        let mut query = self.select_records();
        query.cond_where(self.condition(bounds));
        query.order_by((Alias::new(PRODUCTS), Alias::new("id")), Order::Asc);

        query.to_string(PostgresQueryBuilder)
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn bounds(min: i64, max: i64) -> PriceBounds {
        PriceBounds {
            min: Decimal::from(min),
            max: Decimal::from(max),
        }
    }

    #[test]
    fn zero_filters_query_has_only_price_range() {
        let query = ProductQuery::new(ProductFilter::default());
        let sql = query.page_sql(bounds(0, 1000), "id", SortDirection::Asc, 12, 0);

        assert!(sql.contains("FROM \"products\""));
        assert!(sql.contains(">= 0"));
        assert!(sql.contains("<= 1000"));
        assert!(!sql.contains("LIKE"));
        assert!(!sql.contains("IN ("));
    }

    #[test]
    fn price_bounds_query_ignores_price_filter() {
        let query = ProductQuery::new(ProductFilter {
            min_price: Some(Decimal::from(50)),
            max_price: Some(Decimal::from(500)),
            ..Default::default()
        });
        let sql = query.price_bounds_sql();

        assert!(sql.contains("MIN(\"products\".\"price\")"));
        assert!(sql.contains("MAX(\"products\".\"price\")"));
        // The requested range must not restrict the bound aggregation.
        assert!(!sql.contains("50"));
        assert!(!sql.contains("500"));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn name_filter_matches_substring_case_insensitively() {
        let query = ProductQuery::new(ProductFilter {
            name: Some("Phone".to_string()),
            ..Default::default()
        });
        let sql = query.count_sql(bounds(0, 10));

        assert!(sql.contains("LOWER(\"products\".\"name\")"));
        assert!(sql.contains("LIKE '%phone%'"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        let query = ProductQuery::new(ProductFilter {
            name: Some("100%_done".to_string()),
            ..Default::default()
        });
        let sql = query.count_sql(bounds(0, 10));

        assert!(
            !sql.contains("%100%_done%"),
            "raw wildcard chars should not appear unescaped: {sql}"
        );
    }

    #[test]
    fn membership_filters_lower_both_sides() {
        let query = ProductQuery::new(ProductFilter {
            brands: vec![" Apple ".to_string(), "SAMSUNG".to_string()],
            ..Default::default()
        });
        let sql = query.count_sql(bounds(0, 10));

        assert!(sql.contains("LOWER(\"products\".\"brand\") IN ('apple', 'samsung')"));
    }

    #[test]
    fn empty_lists_are_neutral() {
        let query = ProductQuery::new(ProductFilter {
            brands: vec!["  ".to_string()],
            colors: vec![],
            ..Default::default()
        });
        let sql = query.count_sql(bounds(0, 10));

        assert!(!sql.contains("IN ("));
    }

    #[test]
    fn composed_filters_are_intersected() {
        let query = ProductQuery::new(ProductFilter {
            brands: vec!["apple".to_string()],
            colors: vec!["black".to_string()],
            ..Default::default()
        });
        let sql = query.count_sql(bounds(0, 10));

        assert!(sql.contains("\"brand\""));
        assert!(sql.contains("\"color\""));
        assert!(sql.contains(" AND "));
    }

    #[test]
    fn category_filter_joins_by_name() {
        let query = ProductQuery::new(ProductFilter {
            categories: vec![" Cellular ".to_string()],
            ..Default::default()
        });
        let sql = query.count_sql(bounds(0, 10));

        assert!(sql.contains("INNER JOIN \"categories\""));
        assert!(sql.contains("LOWER(\"categories\".\"name\") IN ('cellular')"));
    }

    #[test]
    fn count_without_category_filter_skips_join() {
        let query = ProductQuery::new(ProductFilter::default());
        let sql = query.count_sql(bounds(0, 10));

        assert!(sql.contains("COUNT(*)"));
        assert!(!sql.contains("JOIN"));
    }

    #[test]
    fn paged_select_projects_category_name() {
        let query = ProductQuery::new(ProductFilter::default());
        let sql = query.page_sql(bounds(0, 10), "price", SortDirection::Desc, 12, 24);

        assert!(sql.contains("INNER JOIN \"categories\""));
        assert!(sql.contains("AS \"category_name\""));
        assert!(sql.contains("ORDER BY \"products\".\"price\" DESC, \"products\".\"id\" ASC"));
        assert!(sql.contains("LIMIT 12"));
        assert!(sql.contains("OFFSET 24"));
    }

    #[test]
    fn sort_direction_reverses_order_clause() {
        let asc = ProductQuery::new(ProductFilter::default()).page_sql(
            bounds(0, 10),
            "name",
            SortDirection::Asc,
            10,
            0,
        );
        let desc = ProductQuery::new(ProductFilter::default()).page_sql(
            bounds(0, 10),
            "name",
            SortDirection::Desc,
            10,
            0,
        );

        assert!(asc.contains("\"name\" ASC"));
        assert!(desc.contains("\"name\" DESC"));
    }

    #[test]
    fn rating_sort_aggregates_in_the_store() {
        let query = ProductQuery::new(ProductFilter::default());
        let sql = query.rating_page_sql(bounds(0, 10), SortDirection::Desc, 12, 0);

        assert!(sql.contains("LEFT JOIN \"ratings\""));
        assert!(sql.contains("GROUP BY \"products\".\"id\", \"categories\".\"name\""));
        assert!(sql.contains("COALESCE(AVG(\"ratings\".\"rating\"), 0) DESC"));
        // Deterministic tie-break.
        assert!(sql.contains("\"products\".\"id\" ASC"));
        assert!(sql.contains("LIMIT 12"));
    }

    #[test]
    fn all_sql_is_unpaged_id_ordered() {
        let query = ProductQuery::new(ProductFilter::default());
        let sql = query.all_sql(bounds(0, 10));

        assert!(!sql.contains("LIMIT"));
        assert!(sql.contains("ORDER BY \"products\".\"id\" ASC"));
    }

    #[test]
    fn bounds_clamp_into_observed_range() {
        // Catalog priced {100, 250, 900}: requesting [50, 500] clamps the
        // minimum up to 100 and keeps the in-range maximum.
        let resolved = PriceBounds::resolve(
            Decimal::from(100),
            Decimal::from(900),
            Some(Decimal::from(50)),
            Some(Decimal::from(500)),
        );
        assert_eq!(resolved.min, Decimal::from(100));
        assert_eq!(resolved.max, Decimal::from(500));
    }

    #[test]
    fn absent_bounds_become_observed_bounds() {
        let resolved = PriceBounds::resolve(Decimal::from(100), Decimal::from(900), None, None);
        assert_eq!(resolved.min, Decimal::from(100));
        assert_eq!(resolved.max, Decimal::from(900));
    }

    #[test]
    fn in_range_bounds_are_kept() {
        let resolved = PriceBounds::resolve(
            Decimal::from(100),
            Decimal::from(900),
            Some(Decimal::from(200)),
            Some(Decimal::from(800)),
        );
        assert_eq!(resolved.min, Decimal::from(200));
        assert_eq!(resolved.max, Decimal::from(800));
    }

    #[test]
    fn escape_like_wildcards_function() {
        assert_eq!(escape_like_wildcards("hello"), "hello");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }
}
