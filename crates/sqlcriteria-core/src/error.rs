//! Error types for the compilation engine and the lifecycle protocol.

use std::error::Error as StdError;
use std::fmt;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building SQL or running entity lifecycle hooks.
///
/// Every variant is fatal for the statement being built: nothing in the engine
/// retries or recovers partially.
#[derive(Debug)]
pub enum Error {
    /// A required collaborator (dialect, naming, target entity) is missing or invalid.
    Config(String),
    /// A criterion, projection or ordering references an entity that is neither the
    /// statement's base table nor one of its joins.
    UnknownEntity {
        /// Name of the unregistered entity.
        entity: String,
        /// Property through which the entity was referenced.
        property: String,
    },
    /// The entity does not declare the requested property.
    UnknownProperty {
        /// Entity name.
        entity: String,
        /// Requested property name.
        property: String,
    },
    /// A table or column name is not a plain SQL identifier.
    InvalidIdentifier(String),
    /// The statement shape cannot be rendered (empty combinator, missing keys, ...).
    Structure(String),
    /// The active dialect does not support the requested feature.
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// Feature that was requested.
        feature: &'static str,
    },
    /// A lifecycle listener failed. Passed through to the caller unmodified.
    Listener(Box<dyn StdError + Send + Sync>),
    /// Free-form error, mostly raised by executors.
    Custom(String),
}

impl Error {
    /// Wrap an arbitrary listener failure.
    pub fn listener<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error::Listener(err.into())
    }

    /// True for errors caused by an unsupported dialect feature.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::UnknownEntity { entity, property } => write!(
                f,
                "entity `{}` referenced by property `{}` is not part of the statement",
                entity, property
            ),
            Error::UnknownProperty { entity, property } => {
                write!(f, "entity `{}` has no property `{}`", entity, property)
            }
            Error::InvalidIdentifier(name) => write!(f, "invalid SQL identifier: {:?}", name),
            Error::Structure(msg) => write!(f, "invalid statement structure: {}", msg),
            Error::Unsupported { dialect, feature } => {
                write!(f, "dialect `{}` does not support {}", dialect, feature)
            }
            Error::Listener(err) => write!(f, "entity listener failed: {}", err),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Listener(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
