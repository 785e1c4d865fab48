//! List query parameter extractor.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::query::QueryParameters;

/// Axum extractor for the query string of a list request.
///
/// Keys and values are percent-decoded; when a key repeats, the last value
/// wins. Extraction never fails, so malformed parameters surface later as
/// query building errors.
#[derive(Debug, Default, Clone)]
pub struct ListParams(pub QueryParameters);

impl ListParams {
    /// Parses a raw query string.
    pub fn from_query(query: &str) -> Self {
        let params = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        ListParams(params)
    }

    /// Returns the parsed parameters.
    pub fn params(&self) -> &QueryParameters {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(ListParams::from_query)
            .unwrap_or_default())
    }
}
