// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types.
//!
//! | Error | Cause | Retried |
//! |-------|-------|---------|
//! | [`ConfigError`] | programmer misuse: a node that never passed through a column constructor, a derivation naming no column | never |
//! | [`ValidationError`] | an insert/update projection rejected the entity | never |
//! | [`DerivationError`] | a derivation function failed | never |
//!
//! All of them surface to the immediate caller through [`Error`].

use std::fmt;

use thiserror::Error;

use crate::validate::{Issue, NodeId, Record};

/// Boxed error used for caller-supplied failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Programmer misuse of the metadata layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Metadata was stored for a node with no root link.
    #[error("not a column type: node {0} has no root link")]
    NotAColumnType(NodeId),

    /// Metadata was requested for a node that has none.
    #[error("no metadata found for node {0}: input must be a column type")]
    NoMetadata(NodeId),

    /// A derivation was declared for a key that is not a column.
    #[error("derivation for `{field}` does not name a column of the schema")]
    UnknownDerivation {
        /// Offending key.
        field: String
    },

    /// A scoped index or unique names a sibling that is not a column.
    #[error("`{field}` is scoped by `{scope}`, which is not a column of the schema")]
    UnknownScopeField {
        /// Declaring column.
        field: String,
        /// Missing sibling.
        scope: String
    },

    /// A table-level index or unique names an unknown column.
    #[error("constraint `{name}` references `{column}`, which is not a column of the schema")]
    UnknownConstraintColumn {
        /// Constraint name.
        name:   String,
        /// Missing column.
        column: String
    },

    /// A discriminator names a field that is not a polymorphic relation.
    #[error("discriminator `{field}` names `{relation}`, which is not a polymorphic relation of the schema")]
    UnknownDiscriminatorRelation {
        /// Discriminator column.
        field:    String,
        /// Named relation.
        relation: String
    },

    /// A mixin was registered as a persistent entity.
    #[error("`{0}` is a mixin and cannot be registered as an entity")]
    AbstractEntity(String)
}

/// A rejected insert or update.
///
/// Carries a snapshot of the entity record as validated and every issue found
/// in the failing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    entity: String,
    record: Record,
    issues: Vec<Issue>
}

impl ValidationError {
    /// Create a validation error.
    #[must_use]
    pub fn new(entity: impl Into<String>, record: Record, issues: Vec<Issue>) -> Self {
        Self {
            entity: entity.into(),
            record,
            issues
        }
    }

    /// Entity name.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Entity record at the time of the failing pass.
    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Issues of the failing pass.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consume into the issue list.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed validation", self.entity)?;
        for (index, issue) in self.issues.iter().enumerate() {
            let sep = if index == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A derivation function failed.
#[derive(Debug, Error)]
#[error("derivation of `{field}` failed: {source}")]
pub struct DerivationError {
    /// Derived field.
    pub field:  String,
    /// Failure returned by the derivation.
    #[source]
    pub source: BoxError
}

/// Every failure the crate reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Programmer misuse.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation failure without a configured transform.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Derivation failure.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// A typed entity did not round-trip through its record form.
    #[error("entity record conversion failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// Validation failure mapped by the configured transform.
    #[error("{0}")]
    Transformed(BoxError)
}

impl Error {
    /// Validation failure, if this is one that was not transformed.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None
        }
    }

    /// Whether this is a validation failure, transformed or not.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Transformed(_))
    }
}
