//! Error handling and result types for Bimap operations.
//!
//! Duplicate keys on the plain `insert` path are not errors (the end handle is
//! returned instead); this type covers the fallible `try_*`/`at_*` surface and
//! the integrity checks in the validation module.

use thiserror::Error;

/// Error type for bimap operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BimapError {
    /// Key not found on the queried side.
    #[error("Key not found in bimap")]
    KeyNotFound,
    /// The left or right value of a pair is already bound.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    /// Internal data structure integrity violation.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),
    /// Tree corruption detected.
    #[error("Corrupted tree: {0}")]
    CorruptedTree(String),
    /// Memory allocation failed.
    #[error("Allocation error: {0}")]
    AllocationError(String),
}

impl BimapError {
    /// Create a DuplicateKey error naming the side that collided
    pub fn duplicate_key(side: &str) -> Self {
        Self::DuplicateKey(format!("{} value is already present", side))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Create an AllocationError with context
    pub fn allocation_error(resource: &str, reason: &str) -> Self {
        Self::AllocationError(format!("Failed to allocate {}: {}", resource, reason))
    }

    /// Check if this error is a missing-key error
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }

    /// Check if this error is an allocation error
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationError(_))
    }
}

/// Internal result type for tree checks
pub(crate) type TreeResult<T> = Result<T, BimapError>;

/// Public result type for bimap operations that may fail
pub type BimapResult<T> = Result<T, BimapError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BimapError>;

/// Result type for bimap modification operations
pub type ModifyResult<T> = Result<T, BimapError>;

/// Result type for construction and copying
pub type InitResult<T> = Result<T, BimapError>;

/// Result extension trait for attaching context to errors
pub trait BimapResultExt<T> {
    /// Convert to a BimapResult with additional context
    fn with_context(self, context: &str) -> BimapResult<T>;

    /// Convert to a BimapResult with operation context
    fn with_operation(self, operation: &str) -> BimapResult<T>;
}

impl<T> BimapResultExt<T> for Result<T, BimapError> {
    fn with_context(self, context: &str) -> BimapResult<T> {
        self.map_err(|e| match e {
            BimapError::KeyNotFound => BimapError::KeyNotFound,
            BimapError::DuplicateKey(msg) => {
                BimapError::DuplicateKey(format!("{}: {}", context, msg))
            }
            BimapError::DataIntegrityError(msg) => BimapError::data_integrity(context, &msg),
            BimapError::CorruptedTree(msg) => BimapError::corrupted_tree(context, &msg),
            BimapError::AllocationError(msg) => {
                BimapError::AllocationError(format!("{}: {}", context, msg))
            }
        })
    }

    fn with_operation(self, operation: &str) -> BimapResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}
