// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validation issues.
//!
//! Every failed check produces one [`Issue`]. A parse collects all independent
//! issues of a pass instead of stopping at the first one.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// One step of an issue path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object field name.
    Key(String),

    /// Array position.
    Index(usize)
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{}", index)
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Machine-readable reason of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A required field was missing.
    Required,

    /// The value had the wrong JSON type.
    InvalidType,

    /// A string did not match its format (email, url, uuid, date).
    InvalidString,

    /// A value was not one of the enumerated options.
    InvalidEnumValue,

    /// A length or numeric lower bound was violated.
    TooSmall,

    /// A length or numeric upper bound was violated.
    TooBig,

    /// A number was not a multiple of the configured step.
    NotMultipleOf,

    /// A strict object received keys it does not declare.
    UnrecognizedKeys,

    /// A refinement predicate rejected the value.
    Custom
}

impl IssueCode {
    /// Snake-case name of the code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidType => "invalid_type",
            Self::InvalidString => "invalid_string",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::NotMultipleOf => "not_multiple_of",
            Self::UnrecognizedKeys => "unrecognized_keys",
            Self::Custom => "custom"
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Location of the offending value, outermost key first.
    pub path: Vec<PathSegment>,

    /// Reason code.
    pub code: IssueCode,

    /// Human-readable reason.
    pub message: String,

    /// Offending input, present when the parse asked for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>
}

impl Issue {
    /// Create an issue without an attached input.
    #[must_use]
    pub fn new(path: Vec<PathSegment>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
            input: None
        }
    }

    /// Dotted rendering of [`Issue::path`], empty for the root.
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// First path segment when it names a field.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path_string(), self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_string_joins_segments() {
        let issue = Issue::new(
            vec!["tags".into(), 2.into(), "name".into()],
            IssueCode::Required,
            "Required"
        );
        assert_eq!(issue.path_string(), "tags.2.name");
        assert_eq!(issue.field(), Some("tags"));
    }

    #[test]
    fn display_without_path() {
        let issue = Issue::new(Vec::new(), IssueCode::Custom, "Invalid input");
        assert_eq!(issue.to_string(), "Invalid input");
        assert_eq!(issue.field(), None);
    }

    #[test]
    fn display_with_path() {
        let issue = Issue::new(vec!["email".into()], IssueCode::InvalidString, "Invalid email");
        assert_eq!(issue.to_string(), "email: Invalid email");
    }

    #[test]
    fn serializes_code_as_snake_case() {
        let issue = Issue::new(vec!["age".into()], IssueCode::TooSmall, "too small");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["code"], "too_small");
        assert_eq!(json["path"], serde_json::json!(["age"]));
        assert!(json.get("input").is_none());
    }

    #[test]
    fn code_as_str() {
        assert_eq!(IssueCode::UnrecognizedKeys.as_str(), "unrecognized_keys");
        assert_eq!(IssueCode::InvalidEnumValue.as_str(), "invalid_enum_value");
    }
}
