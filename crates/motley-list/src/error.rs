//! Error types for handler registration.

use std::error::Error;
use std::fmt;

use crate::item::ItemType;
use crate::registry::TypeKey;

/// Boxed error returned by a handler factory.
pub type FactoryError = Box<dyn Error + 'static>;

/// Errors that can occur while registering a handler.
///
/// Registration failures never poison the registry: the item type is simply
/// left without a handler and renders as a placeholder.
#[derive(Debug)]
pub enum RegistryError {
    /// The handler factory returned an error.
    Construction {
        /// Type name of the handler that failed to build.
        handler: &'static str,
        /// The factory's error.
        source: FactoryError,
    },

    /// A handler is already registered for the item type and the
    /// configuration rejects duplicates.
    Duplicate {
        /// The item type both handlers serve.
        item_type: ItemType,
        /// Key of the handler that was kept.
        existing: TypeKey,
    },

    /// Every type key has been issued.
    KeysExhausted {
        /// The item type that could not be registered.
        item_type: ItemType,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Construction { handler, source } => {
                write!(f, "Failed to construct handler {}: {}", handler, source)
            }
            RegistryError::Duplicate {
                item_type,
                existing,
            } => {
                write!(
                    f,
                    "Handler for item type {} already registered as {}",
                    item_type, existing
                )
            }
            RegistryError::KeysExhausted { item_type } => {
                write!(f, "No type key left for item type {}", item_type)
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RegistryError::Construction { source, .. } => Some(source.as_ref()),
            RegistryError::Duplicate { .. } | RegistryError::KeysExhausted { .. } => None,
        }
    }
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
