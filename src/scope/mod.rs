//! Request-scoped parameter store.
//!
//! A [`RequestScope`] is created empty for each inbound request, filled by the
//! extraction middleware and handed to handlers through the typed `Scope`
//! extractor. Handles are cheap to clone. The key set of a handle never
//! changes, but the cells behind it are shared: re-setting a key that a
//! handle already carries rewrites that cell in place, and every handle
//! carrying the key observes the new value.

mod cell;

pub use cell::{Coercion, ParamCell};

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Slot = Arc<RwLock<ParamCell>>;

/// Named parameter cells attached to one request.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    params: Arc<HashMap<String, Slot>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` under `key`.
    ///
    /// An existing cell for `key` is rewritten in place (dropping its cached
    /// coercions) and the same handle is returned. Otherwise a new handle is
    /// returned that carries the new cell alongside everything `self` carries.
    pub fn set(&self, key: &str, value: impl Into<String>) -> RequestScope {
        if let Some(slot) = self.params.get(key) {
            slot.write()
                .unwrap_or_else(PoisonError::into_inner)
                .set_raw(value);
            return self.clone();
        }

        let mut params = HashMap::clone(&self.params);
        params.insert(key.to_owned(), Arc::new(RwLock::new(ParamCell::new(value))));
        Self {
            params: Arc::new(params),
        }
    }

    /// Snapshot of the cell stored under `key`.
    pub fn get(&self, key: &str) -> Result<ParamCell> {
        let slot = self.params.get(key).ok_or(Error::NotFound)?;
        let cell = slot.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cell.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Set `key` on `scope`, starting from an empty scope when there is none.
pub fn set_param(scope: Option<RequestScope>, key: &str, value: impl Into<String>) -> RequestScope {
    scope.unwrap_or_default().set(key, value)
}

/// Look up `key`, failing with [`Error::NotFound`] when the scope or key is absent.
pub fn get_param(scope: Option<&RequestScope>, key: &str) -> Result<ParamCell> {
    scope.ok_or(Error::NotFound)?.get(key)
}
