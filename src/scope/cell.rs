//! A single request parameter with memoized coercions.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Target type of a cached coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    Int,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parsed {
    Int(i64),
    Bool(bool),
}

/// Raw string value plus the coercions already computed from it.
///
/// Clones share the coercion cache of the raw value they were taken from.
/// `set_raw` swaps in a fresh cache, so a clone taken before the write keeps
/// a cache that is consistent with its own (old) raw value.
#[derive(Debug, Clone, Default)]
pub struct ParamCell {
    raw: String,
    parsed: Arc<Mutex<HashMap<Coercion, Parsed>>>,
}

impl ParamCell {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            parsed: Arc::default(),
        }
    }

    /// Replace the raw value and drop every cached coercion.
    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.raw = value.into();
        self.parsed = Arc::default();
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Base-10 integer view of the raw value, parsed at most once.
    ///
    /// An unparsable value reports [`Error::NotFound`], the same as a key
    /// that was never set.
    pub fn as_int(&self) -> Result<i64> {
        match self.coerce(Coercion::Int, |raw| raw.parse().ok().map(Parsed::Int))? {
            Parsed::Int(value) => Ok(value),
            Parsed::Bool(_) => Err(Error::internal("int cache slot holds a bool")),
        }
    }

    /// Boolean view of the raw value, parsed at most once.
    ///
    /// Accepts `1`, `t`, `true`, `0`, `f` and `false` in any letter case.
    pub fn as_bool(&self) -> Result<bool> {
        match self.coerce(Coercion::Bool, |raw| parse_bool(raw).map(Parsed::Bool))? {
            Parsed::Bool(value) => Ok(value),
            Parsed::Int(_) => Err(Error::internal("bool cache slot holds an int")),
        }
    }

    /// Whether a coercion of the current raw value is already cached.
    pub fn is_cached(&self, kind: Coercion) -> bool {
        self.cache().contains_key(&kind)
    }

    fn coerce(&self, kind: Coercion, parse: impl FnOnce(&str) -> Option<Parsed>) -> Result<Parsed> {
        // The lock is held across the parse so concurrent readers parse once.
        let mut cache = self.cache();
        if let Some(parsed) = cache.get(&kind) {
            return Ok(*parsed);
        }

        let Some(parsed) = parse(&self.raw) else {
            debug!(raw = %self.raw, kind = ?kind, "Parameter coercion failed");
            return Err(Error::NotFound);
        };
        cache.insert(kind, parsed);
        Ok(parsed)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<Coercion, Parsed>> {
        self.parsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for ParamCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
