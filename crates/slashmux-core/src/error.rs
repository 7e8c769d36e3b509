//! Error types for pattern compilation and command tree building.
//!
//! Both families describe programmer errors: they surface while routes are
//! being registered at startup, and the caller is expected to abort rather
//! than serve a partially valid command set.

use thiserror::Error;

use crate::model::OptionType;

/// Errors raised while parsing a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern does not follow the token structure of the grammar.
    #[error("malformed pattern `{pattern}`: {reason}")]
    MalformedPattern {
        /// The offending pattern.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A command, sub-command or option name fails the name syntax.
    #[error("invalid name `{name}`: expected 1 to 32 word characters or '-'")]
    InvalidName { name: String },

    /// The type part of an option token is not a known value type.
    #[error("unknown type `{ty}` for option `{option}`")]
    UnknownOptionType { option: String, ty: String },

    /// Choices were attached to an option that is neither string nor integer.
    #[error("option `{option}` of type {ty} cannot have choices")]
    UnsupportedChoiceType { option: String, ty: OptionType },

    /// A choice value does not match the option's declared type.
    #[error("invalid {ty} choice `{choice}` for option `{option}`")]
    InvalidChoiceValue {
        option: String,
        ty: OptionType,
        choice: String,
    },

    /// More than two plain path segments follow the command name.
    #[error("sub-commands can only be nested 2 layers deep: `{pattern}`")]
    NestingTooDeep { pattern: String },
}

impl PatternError {
    /// Creates a malformed pattern error.
    pub fn malformed(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }
}

/// Errors raised while folding a parsed pattern into the command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A pattern with the same dispatch key was already registered.
    #[error("pattern `{key}` is already registered")]
    DuplicatePattern { key: String },

    /// The pattern would give a command both value options and sub-commands,
    /// or reuse a name for a different node type within one parent.
    #[error("pattern `{key}` conflicts with an existing registration: {reason}")]
    ConflictingShape { key: String, reason: String },
}

impl RegistryError {
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicatePattern { key: key.into() }
    }

    pub fn conflict(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConflictingShape {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for pattern parsing.
pub type PatternResult<T> = Result<T, PatternError>;

/// Result type for command tree operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
