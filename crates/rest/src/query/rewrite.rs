//! Operator rewriting for list filters.
//!
//! Query strings express comparisons with bracket syntax: `rating[gte]=4`.
//! Two rewrites turn the remaining (non-reserved) parameters into a
//! [`FilterExpression`]:
//!
//! - [`structural`] reads the bracket segments of each key. Only a final
//!   segment naming an operator becomes a comparison; other segments address
//!   nested fields. Values are never reinterpreted.
//! - [`textual`] nests the parameters into a JSON object, prefixes every
//!   whole-word operator token in its serialized text with `$`, and reads the
//!   `$`-keys back as comparisons. Values containing an operator word are
//!   rewritten too (`name=lte` filters for `"$lte"`).
//!
//! When a field carries both an equality and comparisons, the comparisons win.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use vacq_persistence::types::{Comparison, ComparisonOperator, FieldPath, FilterExpression};

use super::ListQueryError;
use crate::config::OperatorRewriteMode;

static OPERATOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(gt|gte|lt|lte|in)\b").expect("operator token pattern is valid")
});

/// Rewrites filter parameters using the given mode.
pub fn rewrite(
    mode: OperatorRewriteMode,
    source: &BTreeMap<String, String>,
) -> Result<FilterExpression, ListQueryError> {
    match mode {
        OperatorRewriteMode::Structural => structural(source),
        OperatorRewriteMode::Textual => textual(source),
    }
}

/// Builds a filter from the bracket structure of each parameter key.
pub fn structural(source: &BTreeMap<String, String>) -> Result<FilterExpression, ListQueryError> {
    let mut conditions = Conditions::default();

    for (key, value) in source {
        match split_bracket_key(key) {
            Some((base, segments)) => {
                let operator = segments
                    .last()
                    .and_then(|last| ComparisonOperator::from_token(last));
                match operator {
                    Some(operator) => {
                        let parents = &segments[..segments.len() - 1];
                        conditions
                            .comparisons
                            .push((join_path(base, parents), Comparison::new(operator, value)));
                    }
                    None => conditions
                        .equalities
                        .push((join_path(base, &segments), value.clone())),
                }
            }
            None => conditions.equalities.push((key.clone(), value.clone())),
        }
    }

    conditions.into_filter()
}

/// Builds a filter by `$`-prefixing operator words in the serialized parameters.
pub fn textual(source: &BTreeMap<String, String>) -> Result<FilterExpression, ListQueryError> {
    let mut nested = Map::new();
    for (key, value) in source {
        let (base, segments) = split_bracket_key(key).unwrap_or((key.as_str(), Vec::new()));
        insert_nested(&mut nested, base, &segments, value);
    }

    let serialized = serde_json::to_string(&Value::Object(nested))?;
    let rewritten = OPERATOR_TOKEN.replace_all(&serialized, "$$$1");
    let parsed: Map<String, Value> = serde_json::from_str(&rewritten)?;

    let mut conditions = Conditions::default();
    for (key, value) in parsed {
        conditions.flatten(key, value);
    }

    conditions.into_filter()
}

#[derive(Default)]
struct Conditions {
    equalities: Vec<(String, String)>,
    comparisons: Vec<(String, Comparison)>,
}

impl Conditions {
    /// Collects the conditions of a rewritten JSON value at `path`.
    fn flatten(&mut self, path: String, value: Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let operator = key
                        .strip_prefix('$')
                        .and_then(ComparisonOperator::from_token);
                    match (operator, child) {
                        (Some(operator), Value::String(raw)) => self
                            .comparisons
                            .push((path.clone(), Comparison::new(operator, &raw))),
                        (_, child) => self.flatten(format!("{}.{}", path, key), child),
                    }
                }
            }
            Value::String(literal) => self.equalities.push((path, literal)),
            other => self.equalities.push((path, other.to_string())),
        }
    }

    fn into_filter(self) -> Result<FilterExpression, ListQueryError> {
        let mut filter = FilterExpression::new();
        for (field, value) in self.equalities {
            FieldPath::parse(&field)?;
            filter.insert_equals(field, value);
        }
        for (field, comparison) in self.comparisons {
            FieldPath::parse(&field)?;
            filter.insert_comparison(field, comparison);
        }
        Ok(filter)
    }
}

/// Splits `field[a][b]` into `("field", ["a", "b"])`.
///
/// Returns `None` for keys without brackets and for malformed bracket syntax.
fn split_bracket_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let open = key.find('[')?;
    let (base, mut rest) = key.split_at(open);
    if base.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let segment = &inner[..close];
        if segment.is_empty() || segment.contains('[') {
            return None;
        }
        segments.push(segment);
        rest = &inner[close + 1..];
    }

    Some((base, segments))
}

fn join_path(base: &str, segments: &[&str]) -> String {
    let mut path = base.to_string();
    for segment in segments {
        path.push('.');
        path.push_str(segment);
    }
    path
}

/// Inserts `value` at `key[rest...]`, creating objects along the way.
///
/// An object already at the target position is kept.
fn insert_nested(map: &mut Map<String, Value>, key: &str, rest: &[&str], value: &str) {
    match rest.split_first() {
        None => {
            if !matches!(map.get(key), Some(Value::Object(_))) {
                map.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
        Some((next, tail)) => {
            let entry = map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, next, tail, value);
            }
        }
    }
}
