//! Query types: field paths, projections, sort directives, and find queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QueryError;
use crate::types::document::ID_FIELD;
use crate::types::filter::FilterExpression;

/// A validated dotted path into a document (`address.city`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses and validates a dotted field path.
    ///
    /// Segments must be non-empty and consist of ASCII alphanumerics, `_`,
    /// `$`, or `-`.
    pub fn parse(path: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidFieldPath {
            path: path.to_string(),
        };

        if path.is_empty() {
            return Err(invalid());
        }

        let segments = path
            .split('.')
            .map(|segment| {
                let valid = !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-'));
                if valid {
                    Ok(segment.to_string())
                } else {
                    Err(invalid())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if this path names the top-level field `name`.
    pub fn is_field(&self, name: &str) -> bool {
        self.segments.len() == 1 && self.segments[0] == name
    }

    /// Returns the SQLite JSON path (`$."address"."city"`).
    pub fn to_json_path(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.segments {
            path.push_str(".\"");
            path.push_str(segment);
            path.push('"');
        }
        path
    }

    /// Looks up the value at this path.
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| current.get(segment))
    }

    /// Writes `value` at this path, creating intermediate objects.
    fn insert(&self, document: &mut Map<String, Value>, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut current = document;
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            // Just ensured it's an object
            let Value::Object(next) = entry else {
                return;
            };
            current = next;
        }
        current.insert(last.clone(), value);
    }

    /// Removes the value at this path if present.
    fn remove(&self, document: &mut Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut current = document;
        for segment in parents {
            match current.get_mut(segment) {
                Some(next) => current = next,
                None => return,
            }
        }
        if let Some(obj) = current.as_object_mut() {
            obj.remove(last);
        }
    }
}

/// Which fields of a document to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Return only these fields (plus `_id`).
    Include(Vec<FieldPath>),
    /// Return everything except these fields (`_id` is always kept).
    Exclude(Vec<FieldPath>),
}

impl Projection {
    /// Parses a field list such as `["name", "tel"]` or `["-address"]`.
    ///
    /// Returns `Ok(None)` when the list holds no field names. A leading `-`
    /// marks an exclusion and a leading `+` is ignored; inclusion and
    /// exclusion cannot be mixed.
    pub fn parse<I, S>(fields: I) -> Result<Option<Self>, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        let mut seen = Vec::new();

        for field in fields {
            let field = field.as_ref().trim();
            if field.is_empty() {
                continue;
            }
            seen.push(field.to_string());

            if let Some(excluded) = field.strip_prefix('-') {
                exclude.push(FieldPath::parse(excluded)?);
            } else {
                let included = field.strip_prefix('+').unwrap_or(field);
                include.push(FieldPath::parse(included)?);
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (true, true) => Ok(None),
            (false, true) => Ok(Some(Projection::Include(include))),
            (true, false) => Ok(Some(Projection::Exclude(exclude))),
            (false, false) => Err(QueryError::MixedProjection {
                fields: seen.join(","),
            }),
        }
    }

    /// Returns the projected field paths.
    pub fn fields(&self) -> &[FieldPath] {
        match self {
            Projection::Include(fields) | Projection::Exclude(fields) => fields,
        }
    }

    /// Applies the projection to a document.
    pub fn apply(&self, document: &Value) -> Value {
        match self {
            Projection::Include(fields) => {
                let mut projected = Map::new();
                if let Some(id) = document.get(ID_FIELD) {
                    projected.insert(ID_FIELD.to_string(), id.clone());
                }
                for path in fields {
                    if let Some(value) = path.lookup(document) {
                        path.insert(&mut projected, value.clone());
                    }
                }
                Value::Object(projected)
            }
            Projection::Exclude(fields) => {
                let mut projected = document.clone();
                for path in fields {
                    if !path.is_field(ID_FIELD) {
                        path.remove(&mut projected);
                    }
                }
                projected
            }
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    /// The field to sort by.
    pub field: String,
    /// The direction.
    pub direction: SortDirection,
}

impl SortDirective {
    /// Parses a sort key; a leading `-` sorts descending, `+` or no sign ascending.
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        if let Some(field) = key.strip_prefix('-') {
            Self::desc(field)
        } else {
            Self::asc(key.strip_prefix('+').unwrap_or(key))
        }
    }

    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A complete find request against one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindQuery {
    /// Which documents to match.
    pub filter: FilterExpression,
    /// Which fields to return.
    pub projection: Option<Projection>,
    /// Ordering, most significant key first.
    pub sort: Vec<SortDirective>,
    /// Number of matching documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
}

impl FindQuery {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the projection.
    pub fn with_projection(mut self, projection: Option<Projection>) -> Self {
        self.projection = projection;
        self
    }

    /// Appends a sort key.
    pub fn with_sort(mut self, directive: SortDirective) -> Self {
        self.sort.push(directive);
        self
    }

    /// Sets the number of documents to skip.
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
