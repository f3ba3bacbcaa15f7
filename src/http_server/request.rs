//! # Request Arguments
//!
//! Gathers handler arguments from the query string and the body (body wins
//! on conflict). A body is read as url-encoded form fields when the request
//! says so, and as a JSON object otherwise. Presence is checked before type
//! coercion so a client learns whether a field was missing or malformed.

use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Query, Request},
    http::{header, HeaderMap},
    Form,
};
use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Arguments of one request, keyed by field name
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    values: Map<String, Value>,
}

impl RequestArgs {
    /// Merge query parameters with the body
    pub fn collect(query: HashMap<String, String>, body: &[u8]) -> ApiResult<Self> {
        let mut values: Map<String, Value> = query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        if !body.iter().all(u8::is_ascii_whitespace) {
            match serde_json::from_slice::<Value>(body) {
                Ok(Value::Object(fields)) => values.extend(fields),
                Ok(_) => return Err(ApiError::InvalidBody("expected a JSON object".into())),
                Err(e) => return Err(ApiError::InvalidBody(e.to_string())),
            }
        }

        Ok(Self { values })
    }

    /// Merge query parameters with url-encoded form fields
    pub fn collect_form(
        query: HashMap<String, String>,
        form: HashMap<String, String>,
    ) -> Self {
        let values = query
            .into_iter()
            .chain(form)
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Self { values }
    }

    /// A required text field. Numbers and booleans are taken as their text.
    pub fn required_text(&self, field: &str) -> ApiResult<String> {
        match self.present(field)? {
            Value::String(s) => Ok(s.clone()),
            v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
            _ => Err(ApiError::invalid(field, "text")),
        }
    }

    /// A required integer field: a JSON integer or an integer-parseable string
    pub fn required_int(&self, field: &str) -> ApiResult<i64> {
        let parsed = match self.present(field)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| ApiError::invalid(field, "an integer"))
    }

    /// Present and non-empty, before any coercion
    fn present(&self, field: &str) -> ApiResult<&Value> {
        match self.values.get(field) {
            None | Some(Value::Null) => Err(ApiError::missing(field)),
            Some(Value::String(s)) if s.trim().is_empty() => Err(ApiError::missing(field)),
            Some(value) => Ok(value),
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(FORM_CONTENT_TYPE))
}

#[async_trait]
impl<S> FromRequest<S> for RequestArgs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(|e| ApiError::InvalidBody(e.body_text()))?;

        if is_form(req.headers()) {
            let Form(form) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
            return Ok(Self::collect_form(query, form));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
        Self::collect(query, &body)
    }
}
