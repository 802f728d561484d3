//! SQL identifier validation.
//!
//! Table and column names are spliced into SQL text, so every name produced by
//! a [`Naming`](crate::Naming) policy is checked here first. Values never go
//! through this path; they are always bound as parameters.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Plain identifier, optionally schema-qualified once (`schema.table`).
static IDENTIFIER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    match Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$") {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::error!(error = %e, "identifier pattern failed to compile");
            None
        }
    }
});

/// Check whether `name` is safe to splice into SQL text.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.as_ref().is_some_and(|re| re.is_match(name))
}

/// Validate `name`, returning it unchanged on success.
pub fn validate_identifier(name: String) -> Result<String> {
    if is_valid_identifier(&name) {
        Ok(name)
    } else {
        tracing::warn!(identifier = %name, "rejected SQL identifier");
        Err(Error::InvalidIdentifier(name))
    }
}
