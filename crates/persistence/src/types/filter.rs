//! Filter expressions.
//!
//! A [`FilterExpression`] maps field paths to either a literal value (equality)
//! or a set of comparisons that must all hold. Values are kept as the raw text
//! received from the caller; backends decide how to compare them against the
//! stored value's type.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A comparison operator usable in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Member of a set.
    In,
}

impl ComparisonOperator {
    /// All operators, in token order.
    pub const ALL: [ComparisonOperator; 5] = [
        ComparisonOperator::Gt,
        ComparisonOperator::Gte,
        ComparisonOperator::Lt,
        ComparisonOperator::Lte,
        ComparisonOperator::In,
    ];

    /// Parses an operator token (`gt`, `gte`, `lt`, `lte`, `in`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(ComparisonOperator::Gt),
            "gte" => Some(ComparisonOperator::Gte),
            "lt" => Some(ComparisonOperator::Lt),
            "lte" => Some(ComparisonOperator::Lte),
            "in" => Some(ComparisonOperator::In),
            _ => None,
        }
    }

    /// Returns the token for this operator.
    pub fn as_token(&self) -> &'static str {
        match self {
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Gte => "gte",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Lte => "lte",
            ComparisonOperator::In => "in",
        }
    }

    /// Returns the SQL operator used for a single value.
    ///
    /// `In` compares each member for equality.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::In => "=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// The operand of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    /// A single raw value.
    Single(String),
    /// A list of raw values (for `in`).
    Many(Vec<String>),
}

impl FilterValue {
    /// Returns the raw values.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(v) => vec![v.as_str()],
            FilterValue::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

/// A single operator/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// The operator.
    pub operator: ComparisonOperator,
    /// The operand.
    pub value: FilterValue,
}

impl Comparison {
    /// Builds a comparison from raw text.
    ///
    /// For `in`, the text is split on commas into the member list.
    pub fn new(operator: ComparisonOperator, raw: &str) -> Self {
        let value = match operator {
            ComparisonOperator::In => FilterValue::Many(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            _ => FilterValue::Single(raw.to_string()),
        };
        Self { operator, value }
    }
}

/// The condition applied to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldFilter {
    /// The field equals the literal value.
    Equals(String),
    /// Every comparison must hold.
    Compare(Vec<Comparison>),
}

/// A conjunction of per-field conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterExpression {
    fields: BTreeMap<String, FieldFilter>,
}

impl FilterExpression {
    /// Creates an empty filter that matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition (builder style).
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_equals(field, value);
        self
    }

    /// Adds a comparison condition (builder style).
    pub fn compare(
        mut self,
        field: impl Into<String>,
        operator: ComparisonOperator,
        raw: &str,
    ) -> Self {
        self.insert_comparison(field, Comparison::new(operator, raw));
        self
    }

    /// Sets an equality condition, replacing any previous condition on the field.
    pub fn insert_equals(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(field.into(), FieldFilter::Equals(value.into()));
    }

    /// Adds a comparison to the field.
    ///
    /// An equality previously set on the same field is replaced; a comparison
    /// with the same operator is overwritten.
    pub fn insert_comparison(&mut self, field: impl Into<String>, comparison: Comparison) {
        let entry = self
            .fields
            .entry(field.into())
            .or_insert_with(|| FieldFilter::Compare(Vec::new()));

        match entry {
            FieldFilter::Compare(list) => {
                list.retain(|c| c.operator != comparison.operator);
                list.push(comparison);
            }
            FieldFilter::Equals(_) => *entry = FieldFilter::Compare(vec![comparison]),
        }
    }

    /// Returns the condition on a field.
    pub fn get(&self, field: &str) -> Option<&FieldFilter> {
        self.fields.get(field)
    }

    /// Iterates over field conditions in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldFilter)> {
        self.fields.iter()
    }

    /// Returns the number of constrained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
