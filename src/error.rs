//! Error types for layout definition and connection scope handling.
//!
//! Every fallible operation in the crate returns [`ShelfResult`]. Errors fall
//! into two groups:
//!
//! - **Definition errors** raised while a builder assembles a layout:
//!   [`ShelfError::StructuralMismatch`], [`ShelfError::InvalidName`],
//!   [`ShelfError::PathOverrideConflict`]
//! - **Runtime errors** raised while using a finished layout:
//!   [`ShelfError::Reentrancy`], [`ShelfError::NotConnected`],
//!   [`ShelfError::UnknownMember`], plus wrapped storage and
//!   serialization errors

use std::path::PathBuf;

use crate::layout::MemberKind;

/// Result type used throughout the crate.
pub type ShelfResult<T> = Result<T, ShelfError>;

/// Unified error type for all layout and storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// A member declaration collides with a same-named member of an
    /// incompatible kind, either within one builder or across an
    /// inheritance chain.
    #[error("structural mismatch on '{name}': cannot override {expected} with {found}")]
    StructuralMismatch {
        /// Name shared by the colliding members
        name: String,
        /// Kind of the member already registered under the name
        expected: MemberKind,
        /// Kind of the member attempting the override
        found: MemberKind,
    },

    /// A connection scope was entered while one is already active for the
    /// same database.
    #[error("database '{0}' already has an active connection scope")]
    Reentrancy(String),

    /// A table operation was attempted outside an active connection scope.
    #[error("table '{0}' has no active connection; enter the database scope first")]
    NotConnected(String),

    /// Two explicit location overrides for the same container disagree.
    #[error("conflicting location overrides for '{name}': '{}' vs '{}'", .first.display(), .second.display())]
    PathOverrideConflict {
        /// Container whose location was overridden twice
        name: String,
        /// Location set by the earlier override
        first: PathBuf,
        /// Location set by the later override
        second: PathBuf,
    },

    /// A container or member name failed validation.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A lookup referenced a member the container does not hold.
    #[error("no member named '{name}' in '{container}'")]
    UnknownMember {
        /// Container the lookup ran against
        container: String,
        /// Name that was requested
        name: String,
    },

    /// Error from the embedded storage engine.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Error serializing or deserializing row or schema data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while reading configuration or layout data.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a configuration file.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl ShelfError {
    /// Create an `InvalidName` error.
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName(message.into())
    }

    /// Create an `UnknownMember` error.
    pub fn unknown_member(container: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownMember {
            container: container.into(),
            name: name.into(),
        }
    }

    /// Create a `StructuralMismatch` error.
    pub fn structural_mismatch(
        name: impl Into<String>,
        expected: MemberKind,
        found: MemberKind,
    ) -> Self {
        Self::StructuralMismatch {
            name: name.into(),
            expected,
            found,
        }
    }

    /// Whether the operation can be retried once the caller fixes its usage,
    /// as opposed to a defect in the layout definition itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Reentrancy(_) | Self::NotConnected(_) | Self::UnknownMember { .. }
        )
    }
}
