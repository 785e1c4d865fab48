//! List query builder.

use std::collections::BTreeMap;

use vacq_persistence::types::{
    CREATED_AT_FIELD, FieldPath, FilterExpression, FindQuery, Projection, SortDirective,
};

use super::pagination::Pagination;
use super::rewrite;
use super::{ListQueryError, QueryParameters, RESERVED_PARAMETERS};
use crate::config::OperatorRewriteMode;

/// Everything needed to run one list query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Conditions built from the non-reserved parameters.
    pub filter: FilterExpression,
    /// Fields to return, from `select`.
    pub projection: Option<Projection>,
    /// Sort keys, from `sort` (newest first by default).
    pub sort: Vec<SortDirective>,
    /// The requested page.
    pub pagination: Pagination,
}

impl QueryPlan {
    /// Number of records skipped before the page.
    pub fn skip(&self) -> u64 {
        self.pagination.start_index()
    }

    /// Maximum number of records on the page.
    pub fn take(&self) -> u64 {
        self.pagination.limit()
    }

    /// Converts the plan into a storage query.
    pub fn to_find_query(&self) -> FindQuery {
        let mut query = FindQuery::new()
            .with_filter(self.filter.clone())
            .with_projection(self.projection.clone())
            .with_skip(self.skip())
            .with_limit(self.take());
        for directive in &self.sort {
            query = query.with_sort(directive.clone());
        }
        query
    }
}

/// Derives [`QueryPlan`]s from list request parameters.
#[derive(Debug, Clone, Copy)]
pub struct ListQueryBuilder {
    mode: OperatorRewriteMode,
    default_limit: u64,
}

impl ListQueryBuilder {
    /// Creates a builder.
    pub fn new(mode: OperatorRewriteMode, default_limit: u64) -> Self {
        Self {
            mode,
            default_limit: default_limit.max(1),
        }
    }

    /// Returns the operator rewrite mode.
    pub fn mode(&self) -> OperatorRewriteMode {
        self.mode
    }

    /// Returns the page size used when `limit` is unusable.
    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// Builds the plan for a set of request parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a filter field, projected field or sort key is not
    /// a valid field path, or if the projection mixes inclusion and
    /// exclusion.
    pub fn build(&self, params: &QueryParameters) -> Result<QueryPlan, ListQueryError> {
        let source: BTreeMap<String, String> = params
            .iter()
            .filter(|(key, _)| !RESERVED_PARAMETERS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let filter = rewrite::rewrite(self.mode, &source)?;

        let projection = match params.get("select") {
            Some(select) => Projection::parse(select.split(','))?,
            None => None,
        };

        let sort = match params.get("sort").map(|s| s.trim()) {
            Some(sort) if !sort.is_empty() => parse_sort(sort)?,
            _ => vec![SortDirective::desc(CREATED_AT_FIELD)],
        };

        let pagination = Pagination::from_params(
            params.get("page").map(String::as_str),
            params.get("limit").map(String::as_str),
            self.default_limit,
        );

        Ok(QueryPlan {
            filter,
            projection,
            sort,
            pagination,
        })
    }
}

/// Parses `-createdAt,name` into ordered sort directives.
fn parse_sort(raw: &str) -> Result<Vec<SortDirective>, ListQueryError> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| {
            let directive = SortDirective::parse(key);
            FieldPath::parse(&directive.field)?;
            Ok(directive)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vacq_persistence::types::{
        Comparison, ComparisonOperator, FieldFilter, SortDirection,
    };

    fn params(pairs: &[(&str, &str)]) -> QueryParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn builder() -> ListQueryBuilder {
        ListQueryBuilder::new(OperatorRewriteMode::Structural, 25)
    }

    #[test]
    fn test_empty_params_use_defaults() {
        let plan = builder().build(&QueryParameters::new()).unwrap();
        assert!(plan.filter.is_empty());
        assert!(plan.projection.is_none());
        assert_eq!(plan.sort, vec![SortDirective::desc("createdAt")]);
        assert_eq!(plan.pagination, Pagination::new(1, 25));
        assert_eq!(plan.skip(), 0);
        assert_eq!(plan.take(), 25);
    }

    #[test]
    fn test_reserved_keys_are_not_filters() {
        let plan = builder()
            .build(&params(&[
                ("select", "name"),
                ("sort", "name"),
                ("page", "2"),
                ("limit", "5"),
                ("region", "Central"),
            ]))
            .unwrap();
        assert_eq!(plan.filter.len(), 1);
        assert_eq!(
            plan.filter.get("region"),
            Some(&FieldFilter::Equals("Central".to_string()))
        );
    }

    #[test]
    fn test_select_preserves_order() {
        let plan = builder().build(&params(&[("select", "name,email")])).unwrap();
        let fields: Vec<String> = plan
            .projection
            .unwrap()
            .fields()
            .iter()
            .map(|f| f.segments().join("."))
            .collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[test]
    fn test_select_exclusion() {
        let plan = builder().build(&params(&[("select", "-address,-tel")])).unwrap();
        assert!(matches!(plan.projection, Some(Projection::Exclude(_))));
    }

    #[test]
    fn test_select_mixed_is_rejected() {
        let result = builder().build(&params(&[("select", "name,-tel")]));
        assert!(matches!(result, Err(ListQueryError::Query(_))));
    }

    #[test]
    fn test_sort_keys() {
        let plan = builder()
            .build(&params(&[("sort", "-createdAt,name")]))
            .unwrap();
        assert_eq!(plan.sort.len(), 2);
        assert_eq!(plan.sort[0].field, "createdAt");
        assert_eq!(plan.sort[0].direction, SortDirection::Descending);
        assert_eq!(plan.sort[1].field, "name");
        assert_eq!(plan.sort[1].direction, SortDirection::Ascending);
    }

    #[test]
    fn test_invalid_sort_key_is_rejected() {
        assert!(builder().build(&params(&[("sort", "na me")])).is_err());
    }

    #[test]
    fn test_pagination_parsing() {
        let plan = builder()
            .build(&params(&[("page", "3"), ("limit", "10")]))
            .unwrap();
        assert_eq!(plan.skip(), 20);
        assert_eq!(plan.take(), 10);

        let plan = builder()
            .build(&params(&[("page", "abc"), ("limit", "xyz")]))
            .unwrap();
        assert_eq!(plan.pagination, Pagination::new(1, 25));
    }

    #[test]
    fn test_comparison_filter() {
        let plan = builder().build(&params(&[("rating[gte]", "4")])).unwrap();
        assert_eq!(
            plan.filter.get("rating"),
            Some(&FieldFilter::Compare(vec![Comparison::new(
                ComparisonOperator::Gte,
                "4"
            )]))
        );
    }

    #[test]
    fn test_operator_word_value_by_mode() {
        let source = params(&[("name", "lte")]);

        let structural = builder().build(&source).unwrap();
        assert_eq!(
            structural.filter.get("name"),
            Some(&FieldFilter::Equals("lte".to_string()))
        );

        let textual = ListQueryBuilder::new(OperatorRewriteMode::Textual, 25)
            .build(&source)
            .unwrap();
        assert_eq!(
            textual.filter.get("name"),
            Some(&FieldFilter::Equals("$lte".to_string()))
        );
    }

    #[test]
    fn test_find_query_conversion() {
        let plan = builder()
            .build(&params(&[("page", "2"), ("limit", "10"), ("sort", "name")]))
            .unwrap();
        let query = plan.to_find_query();
        assert_eq!(query.skip, 10);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.sort, vec![SortDirective::asc("name")]);
    }
}
