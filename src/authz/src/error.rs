//! Error types for role resolution

use thiserror::Error;

pub use crate::registry::RegistryError;
pub use crate::resolver::CycleError;

/// Role resolution errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Registry construction failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A conversion chain revisited a role kind
    #[error("Cycle error: {0}")]
    Cycle(#[from] CycleError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for role resolution operations
pub type Result<T> = std::result::Result<T, AuthzError>;
