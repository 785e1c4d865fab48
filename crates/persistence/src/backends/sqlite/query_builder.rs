//! SQL query builder for document queries.
//!
//! Translates [`FilterExpression`]s and [`FindQuery`]s into SQL over the
//! `documents` table, using the JSON1 functions to reach into document content.
//!
//! Comparisons are type-aware: the stored value's JSON type decides whether the
//! raw filter text is compared as a number, a boolean, or text. A value that
//! cannot be read as the stored type never matches.

use rusqlite::ToSql;
use rusqlite::types::{Null, ToSqlOutput};
use serde_json::Value;

use crate::error::QueryError;
use crate::types::{
    Comparison, ComparisonOperator, FieldFilter, FieldPath, FilterExpression, FilterValue,
    FindQuery, SortDirection,
};

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Reads raw filter text as a number, or `Null` if it is not one.
    pub fn number(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(i) = raw.parse::<i64>() {
            return SqlParam::Integer(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => SqlParam::Float(f),
            _ => SqlParam::Null,
        }
    }

    /// Reads raw filter text as a boolean (1/0), or `Null` if it is not one.
    pub fn boolean(raw: &str) -> Self {
        match raw.trim() {
            "true" => SqlParam::Integer(1),
            "false" => SqlParam::Integer(0),
            _ => SqlParam::Null,
        }
    }

    /// Serializes values into a JSON array parameter for `json_each`.
    pub fn json_array(values: Vec<Value>) -> Self {
        SqlParam::String(Value::Array(values).to_string())
    }

    /// Converts an unsigned count into an integer parameter, saturating.
    pub fn count(n: u64) -> Self {
        SqlParam::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => s.to_sql(),
            SqlParam::Integer(i) => Ok(ToSqlOutput::from(*i)),
            SqlParam::Float(f) => Ok(ToSqlOutput::from(*f)),
            SqlParam::Null => Ok(ToSqlOutput::from(Null)),
        }
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter and returns its placeholder (`?N`).
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Appends raw SQL.
    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
}

/// Builds SQL statements for one collection.
pub struct QueryBuilder {
    collection: String,
}

impl QueryBuilder {
    /// Creates a builder for the given collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    /// `SELECT id, data, created_at, updated_at ...` for a find query.
    pub fn build_find(&self, query: &FindQuery) -> Result<SqlFragment, QueryError> {
        let mut fragment =
            SqlFragment::new("SELECT id, data, created_at, updated_at FROM documents");
        self.push_where(&mut fragment, &query.filter)?;

        fragment.push_sql(" ORDER BY ");
        let mut keys = Vec::with_capacity(query.sort.len() + 1);
        for directive in &query.sort {
            let path = FieldPath::parse(&directive.field)?;
            let placeholder = fragment.add_param(SqlParam::string(path.to_json_path()));
            keys.push(format!(
                "json_extract(data, {}) {}",
                placeholder,
                directive.direction.as_sql()
            ));
        }
        // Ties fall back to insertion order, following the last sort key
        let tie_break = query
            .sort
            .last()
            .map(|d| d.direction)
            .unwrap_or(SortDirection::Ascending);
        keys.push(format!("rowid {}", tie_break.as_sql()));
        fragment.push_sql(&keys.join(", "));

        let limit = fragment.add_param(
            query
                .limit
                .map(SqlParam::count)
                .unwrap_or(SqlParam::Integer(-1)),
        );
        let offset = fragment.add_param(SqlParam::count(query.skip));
        fragment.push_sql(&format!(" LIMIT {} OFFSET {}", limit, offset));

        Ok(fragment)
    }

    /// `SELECT COUNT(*) ...` for a filter.
    pub fn build_count(&self, filter: &FilterExpression) -> Result<SqlFragment, QueryError> {
        let mut fragment = SqlFragment::new("SELECT COUNT(*) FROM documents");
        self.push_where(&mut fragment, filter)?;
        Ok(fragment)
    }

    /// `DELETE ...` for a filter.
    pub fn build_delete(&self, filter: &FilterExpression) -> Result<SqlFragment, QueryError> {
        let mut fragment = SqlFragment::new("DELETE FROM documents");
        self.push_where(&mut fragment, filter)?;
        Ok(fragment)
    }

    fn push_where(
        &self,
        fragment: &mut SqlFragment,
        filter: &FilterExpression,
    ) -> Result<(), QueryError> {
        let collection = fragment.add_param(SqlParam::string(self.collection.clone()));
        fragment.push_sql(&format!(" WHERE collection = {}", collection));

        for (field, condition) in filter.iter() {
            let path = FieldPath::parse(field)?;
            let clause = match condition {
                FieldFilter::Equals(value) => typed_comparison(fragment, &path, "=", value),
                FieldFilter::Compare(comparisons) => {
                    let clauses: Vec<String> = comparisons
                        .iter()
                        .map(|c| comparison_clause(fragment, &path, c))
                        .collect();
                    if clauses.is_empty() {
                        "1".to_string()
                    } else {
                        clauses.join(" AND ")
                    }
                }
            };
            fragment.push_sql(&format!(" AND ({})", clause));
        }

        Ok(())
    }
}

/// Builds the clause for one comparison.
fn comparison_clause(
    fragment: &mut SqlFragment,
    path: &FieldPath,
    comparison: &Comparison,
) -> String {
    let op = comparison.operator.sql_operator();
    match (&comparison.operator, &comparison.value) {
        (ComparisonOperator::In, value) => membership(fragment, path, &value.values()),
        (_, FilterValue::Single(value)) => typed_comparison(fragment, path, op, value),
        (_, FilterValue::Many(values)) => {
            let clauses: Vec<String> = values
                .iter()
                .map(|value| typed_comparison(fragment, path, op, value))
                .collect();
            format!("({})", clauses.join(" AND "))
        }
    }
}

/// Tests the stored value at `path` for membership in `members`.
///
/// Each member is read once per stored JSON type and bound as a JSON array,
/// so the clause has the same size whatever the number of members.
fn membership(fragment: &mut SqlFragment, path: &FieldPath, members: &[&str]) -> String {
    if members.is_empty() {
        // Empty set matches nothing
        return "0".to_string();
    }

    let mut numbers = Vec::new();
    let mut booleans = Vec::new();
    for member in members {
        match SqlParam::number(member) {
            SqlParam::Integer(i) => numbers.push(Value::from(i)),
            SqlParam::Float(f) => numbers.push(Value::from(f)),
            _ => {}
        }
        if let SqlParam::Integer(b) = SqlParam::boolean(member) {
            booleans.push(Value::from(b));
        }
    }
    let texts: Vec<Value> = members.iter().map(|m| Value::from(*m)).collect();

    let p = fragment.add_param(SqlParam::string(path.to_json_path()));
    let num = fragment.add_param(SqlParam::json_array(numbers));
    let boolean = fragment.add_param(SqlParam::json_array(booleans));
    let text = fragment.add_param(SqlParam::json_array(texts));

    format!(
        "CASE \
         WHEN json_type(data, {p}) IN ('integer', 'real') \
         THEN json_extract(data, {p}) IN (SELECT value FROM json_each({num})) \
         WHEN json_type(data, {p}) = 'true' THEN 1 IN (SELECT value FROM json_each({boolean})) \
         WHEN json_type(data, {p}) = 'false' THEN 0 IN (SELECT value FROM json_each({boolean})) \
         WHEN json_type(data, {p}) = 'text' \
         THEN json_extract(data, {p}) IN (SELECT value FROM json_each({text})) \
         ELSE 0 END"
    )
}

/// Compares the stored value at `path` with raw text, by the stored JSON type.
fn typed_comparison(
    fragment: &mut SqlFragment,
    path: &FieldPath,
    op: &str,
    raw: &str,
) -> String {
    let p = fragment.add_param(SqlParam::string(path.to_json_path()));
    let num = fragment.add_param(SqlParam::number(raw));
    let boolean = fragment.add_param(SqlParam::boolean(raw));
    let text = fragment.add_param(SqlParam::string(raw));

    format!(
        "CASE \
         WHEN json_type(data, {p}) IN ('integer', 'real') THEN json_extract(data, {p}) {op} {num} \
         WHEN json_type(data, {p}) = 'true' THEN 1 {op} {boolean} \
         WHEN json_type(data, {p}) = 'false' THEN 0 {op} {boolean} \
         WHEN json_type(data, {p}) = 'text' THEN json_extract(data, {p}) {op} {text} \
         ELSE 0 END"
    )
}
