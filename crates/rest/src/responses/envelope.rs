//! Success envelopes.
//!
//! A list response reports the records of one page together with links to
//! the neighbouring pages:
//!
//! ```json
//! {
//!   "success": true,
//!   "count": 2,
//!   "pagination": { "next": { "page": 3, "limit": 2 }, "prev": { "page": 1, "limit": 2 } },
//!   "data": [ ... ]
//! }
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::query::Pagination;

/// Reference to a neighbouring page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    /// Page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

/// Links to the pages around the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// The following page, if any records remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    /// The preceding page, unless this is the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

/// Body of a list response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Number of records on this page.
    pub count: usize,
    /// Neighbouring pages.
    pub pagination: PageLinks,
    /// The records.
    pub data: Vec<Value>,
}

impl ResultEnvelope {
    /// Builds the envelope for one page of `total` matching records.
    pub fn assemble(total: u64, pagination: &Pagination, records: Vec<Value>) -> Self {
        let page = pagination.page();
        let limit = pagination.limit();

        let next = pagination.has_next(total).then(|| PageRef {
            page: page.saturating_add(1),
            limit,
        });
        let prev = pagination.has_prev().then(|| PageRef {
            page: page - 1,
            limit,
        });

        Self {
            success: true,
            count: records.len(),
            pagination: PageLinks { next, prev },
            data: records,
        }
    }
}

/// Body of a single-record response: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEnvelope<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Wraps a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "n": i })).collect()
    }

    #[test]
    fn test_first_page_has_only_next() {
        let envelope = ResultEnvelope::assemble(5, &Pagination::new(1, 2), records(2));
        assert_eq!(envelope.count, 2);
        assert_eq!(envelope.pagination.next, Some(PageRef { page: 2, limit: 2 }));
        assert_eq!(envelope.pagination.prev, None);
    }

    #[test]
    fn test_middle_page_has_both() {
        let envelope = ResultEnvelope::assemble(5, &Pagination::new(2, 2), records(2));
        assert_eq!(envelope.pagination.next, Some(PageRef { page: 3, limit: 2 }));
        assert_eq!(envelope.pagination.prev, Some(PageRef { page: 1, limit: 2 }));
    }

    #[test]
    fn test_last_page_has_only_prev() {
        let envelope = ResultEnvelope::assemble(5, &Pagination::new(3, 2), records(1));
        assert_eq!(envelope.count, 1);
        assert_eq!(envelope.pagination.next, None);
        assert_eq!(envelope.pagination.prev, Some(PageRef { page: 2, limit: 2 }));
    }

    #[test]
    fn test_empty_collection() {
        let envelope = ResultEnvelope::assemble(0, &Pagination::new(1, 25), Vec::new());
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": true, "count": 0, "pagination": {}, "data": [] })
        );
    }

    #[test]
    fn test_page_past_the_end() {
        let envelope = ResultEnvelope::assemble(3, &Pagination::new(5, 2), Vec::new());
        assert_eq!(envelope.count, 0);
        assert_eq!(envelope.pagination.next, None);
        assert_eq!(envelope.pagination.prev, Some(PageRef { page: 4, limit: 2 }));
    }

    #[test]
    fn test_data_envelope_serialization() {
        assert_eq!(
            serde_json::to_value(DataEnvelope::ok(json!({}))).unwrap(),
            json!({ "success": true, "data": {} })
        );
        assert_eq!(
            serde_json::to_value(DataEnvelope::ok(Value::Null)).unwrap(),
            json!({ "success": true, "data": null })
        );
    }
}
