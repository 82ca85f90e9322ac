//! Path parameter extraction.
//!
//! [`extract_path_param`] runs as a route layer in front of handlers. It
//! validates one raw path segment and installs it into the request's
//! [`RequestScope`]; handlers read it back through the [`Scope`] extractor.

use super::error::ApiError;
use crate::error::Result;
use crate::scope::{ParamCell, RequestScope, get_param, set_param};
use axum::{
    extract::{FromRequestParts, RawPathParams, Request, State, rejection::RawPathParamsRejection},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex_lite::Regex;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, warn};

/// Reserved pattern for values that must look like an unsigned integer.
pub const UNSIGNED_INT_PATTERN: &str = "^[0-9]+$";

#[derive(Debug)]
enum Matcher {
    Any,
    Regex(Regex),
    Malformed(String),
}

/// Key and validation pattern of one path parameter.
///
/// An empty (or blank) pattern accepts any non-empty value. Other patterns
/// use unanchored regex matching unless they anchor themselves.
#[derive(Debug, Clone)]
pub struct PathParam {
    key: Arc<str>,
    pattern: Arc<str>,
    matcher: Arc<Matcher>,
}

impl PathParam {
    pub fn new(key: &str, pattern: &str) -> Self {
        let pattern = pattern.trim();
        let matcher = if pattern.is_empty() {
            Matcher::Any
        } else {
            match Regex::new(pattern) {
                Ok(regex) => Matcher::Regex(regex),
                Err(err) => {
                    warn!(key, pattern, error = %err, "Path parameter pattern does not compile");
                    Matcher::Malformed(err.to_string())
                }
            }
        };
        Self {
            key: key.into(),
            pattern: pattern.into(),
            matcher: Arc::new(matcher),
        }
    }

    /// Parameter that must be an unsigned base-10 integer.
    pub fn int(key: &str) -> Self {
        Self::new(key, UNSIGNED_INT_PATTERN)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn validate(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match &*self.matcher {
            Matcher::Any => true,
            Matcher::Regex(regex) => regex.is_match(value),
            Matcher::Malformed(err) => {
                error!(pattern = %self.pattern, value, error = %err, "Regex matching failed");
                false
            }
        }
    }
}

/// Validate the configured path segment and add it to the request scope.
///
/// Install with `axum::middleware::from_fn_with_state(PathParam::int("id"), extract_path_param)`.
/// On failure answers 400 without running the rest of the stack.
pub async fn extract_path_param(
    State(param): State<PathParam>,
    path: std::result::Result<RawPathParams, RawPathParamsRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let value = path
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(key, _)| *key == param.key())
                .map(|(_, value)| value.to_owned())
        })
        .unwrap_or_default();

    if !param.validate(&value) {
        return ApiError::bad_request(&format!("{} could not be retrieved", param.key()))
            .into_response();
    }

    let scope = request.extensions_mut().remove::<RequestScope>();
    let scope = set_param(scope, param.key(), value);
    request.extensions_mut().insert(scope);

    next.run(request).await
}

/// Handler-side view of the request scope. Holds `None` when no extraction
/// middleware ran for the route.
#[derive(Debug, Clone, Default)]
pub struct Scope(pub Option<RequestScope>);

impl Scope {
    pub fn param(&self, key: &str) -> Result<ParamCell> {
        get_param(self.0.as_ref(), key)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Scope {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<RequestScope>().cloned()))
    }
}
