// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Refinement checks attached to validation nodes.
//!
//! # Check Kinds
//!
//! | Check | Applies to | Issue code |
//! |-------|------------|------------|
//! | `NonEmpty`, `MinLength(n)` | strings, arrays | `too_small` |
//! | `MaxLength(n)` | strings, arrays | `too_big` |
//! | `Length(n)` | strings, arrays | `too_small` / `too_big` |
//! | `Email`, `Url` | strings | `invalid_string` |
//! | `Gt`, `Gte` | numbers | `too_small` |
//! | `Lt`, `Lte` | numbers | `too_big` |
//! | `MultipleOf` | numbers | `not_multiple_of` |
//! | `Refine`, `RefineAsync` | anything | `custom` |
//!
//! A check whose target does not apply to the value (a length bound on a
//! number, say) passes silently; the shape check already reported the type
//! mismatch.

use std::{fmt, future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use serde_json::Value;
use validator::{ValidateEmail, ValidateUrl};

use super::issue::IssueCode;

/// Synchronous refinement predicate.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Asynchronous refinement predicate.
pub type AsyncPredicate = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;

const EPSILON: f64 = 1e-9;

/// What a [`Check`] verifies.
#[derive(Clone)]
pub enum CheckKind {
    /// Default non-empty bound installed by string constructors.
    ///
    /// Dropped when the column becomes optional or nullable.
    NonEmpty,

    /// Minimum length.
    MinLength(usize),

    /// Maximum length.
    MaxLength(usize),

    /// Exact length.
    Length(usize),

    /// Email address format.
    Email,

    /// URL format.
    Url,

    /// Strictly greater than.
    Gt(f64),

    /// Greater than or equal.
    Gte(f64),

    /// Strictly less than.
    Lt(f64),

    /// Less than or equal.
    Lte(f64),

    /// Multiple of a step.
    MultipleOf(f64),

    /// Custom synchronous predicate.
    Refine(Predicate),

    /// Custom asynchronous predicate; only honored by async parses.
    RefineAsync(AsyncPredicate)
}

impl fmt::Debug for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEmpty => f.write_str("NonEmpty"),
            Self::MinLength(n) => write!(f, "MinLength({})", n),
            Self::MaxLength(n) => write!(f, "MaxLength({})", n),
            Self::Length(n) => write!(f, "Length({})", n),
            Self::Email => f.write_str("Email"),
            Self::Url => f.write_str("Url"),
            Self::Gt(n) => write!(f, "Gt({})", n),
            Self::Gte(n) => write!(f, "Gte({})", n),
            Self::Lt(n) => write!(f, "Lt({})", n),
            Self::Lte(n) => write!(f, "Lte({})", n),
            Self::MultipleOf(n) => write!(f, "MultipleOf({})", n),
            Self::Refine(_) => f.write_str("Refine(..)"),
            Self::RefineAsync(_) => f.write_str("RefineAsync(..)")
        }
    }
}

/// A check plus an optional custom failure message.
#[derive(Debug, Clone)]
pub struct Check {
    kind:    CheckKind,
    message: Option<String>
}

/// Result of evaluating one check against a present value.
pub(crate) enum Outcome {
    Pass,
    Fail(IssueCode, String),
    Deferred(AsyncPredicate, String)
}

impl Check {
    /// Create a check with the default message.
    #[must_use]
    pub const fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            message: None
        }
    }

    /// Wrap a synchronous predicate.
    #[must_use]
    pub fn refine<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static
    {
        Self::new(CheckKind::Refine(Arc::new(predicate))).with_message(message)
    }

    /// Wrap an asynchronous predicate.
    #[must_use]
    pub fn refine_async<F, Fut>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static
    {
        let predicate: AsyncPredicate = Arc::new(move |value| predicate(value).boxed());
        Self::new(CheckKind::RefineAsync(predicate)).with_message(message)
    }

    /// Replace the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Kind of this check.
    #[must_use]
    pub const fn kind(&self) -> &CheckKind {
        &self.kind
    }

    /// Custom failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether this check needs an async parse.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(self.kind, CheckKind::RefineAsync(_))
    }

    /// Whether this is a length bound that a later bound of the same kind
    /// replaces.
    pub(crate) fn same_bound(&self, other: &CheckKind) -> bool {
        matches!(
            (&self.kind, other),
            (CheckKind::MinLength(_) | CheckKind::NonEmpty, CheckKind::MinLength(_))
                | (CheckKind::MaxLength(_), CheckKind::MaxLength(_))
                | (CheckKind::Length(_), CheckKind::Length(_))
        )
    }

    pub(crate) fn evaluate(&self, value: &Value) -> Outcome {
        match &self.kind {
            CheckKind::NonEmpty => self.min_length(value, 1),
            CheckKind::MinLength(n) => self.min_length(value, *n),
            CheckKind::MaxLength(n) => self.max_length(value, *n),
            CheckKind::Length(n) => match measure(value) {
                Some((len, unit)) if len < *n => self.fail(
                    IssueCode::TooSmall,
                    format!("{} must contain exactly {} {}", unit.noun, n, unit.item)
                ),
                Some((len, unit)) if len > *n => self.fail(
                    IssueCode::TooBig,
                    format!("{} must contain exactly {} {}", unit.noun, n, unit.item)
                ),
                _ => Outcome::Pass
            },
            CheckKind::Email => match value {
                Value::String(s) if !s.validate_email() => {
                    self.fail(IssueCode::InvalidString, "Invalid email".to_string())
                }
                _ => Outcome::Pass
            },
            CheckKind::Url => match value {
                Value::String(s) if !s.validate_url() => {
                    self.fail(IssueCode::InvalidString, "Invalid url".to_string())
                }
                _ => Outcome::Pass
            },
            CheckKind::Gt(bound) => self.compare(value, |n| n > *bound, || {
                (IssueCode::TooSmall, format!("Number must be greater than {}", bound))
            }),
            CheckKind::Gte(bound) => self.compare(value, |n| n >= *bound, || {
                (
                    IssueCode::TooSmall,
                    format!("Number must be greater than or equal to {}", bound)
                )
            }),
            CheckKind::Lt(bound) => self.compare(value, |n| n < *bound, || {
                (IssueCode::TooBig, format!("Number must be less than {}", bound))
            }),
            CheckKind::Lte(bound) => self.compare(value, |n| n <= *bound, || {
                (
                    IssueCode::TooBig,
                    format!("Number must be less than or equal to {}", bound)
                )
            }),
            CheckKind::MultipleOf(step) => self.compare(value, |n| is_multiple(n, *step), || {
                (IssueCode::NotMultipleOf, format!("Number must be a multiple of {}", step))
            }),
            CheckKind::Refine(predicate) => {
                if predicate(value) {
                    Outcome::Pass
                } else {
                    self.fail(IssueCode::Custom, "Invalid input".to_string())
                }
            }
            CheckKind::RefineAsync(predicate) => Outcome::Deferred(
                Arc::clone(predicate),
                self.message
                    .clone()
                    .unwrap_or_else(|| "Invalid input".to_string())
            )
        }
    }

    fn min_length(&self, value: &Value, min: usize) -> Outcome {
        match measure(value) {
            Some((len, unit)) if len < min => self.fail(
                IssueCode::TooSmall,
                format!("{} must contain at least {} {}", unit.noun, min, unit.item)
            ),
            _ => Outcome::Pass
        }
    }

    fn max_length(&self, value: &Value, max: usize) -> Outcome {
        match measure(value) {
            Some((len, unit)) if len > max => self.fail(
                IssueCode::TooBig,
                format!("{} must contain at most {} {}", unit.noun, max, unit.item)
            ),
            _ => Outcome::Pass
        }
    }

    fn compare(
        &self,
        value: &Value,
        accept: impl FnOnce(f64) -> bool,
        reject: impl FnOnce() -> (IssueCode, String)
    ) -> Outcome {
        match value.as_f64() {
            Some(n) if !accept(n) => {
                let (code, message) = reject();
                self.fail(code, message)
            }
            _ => Outcome::Pass
        }
    }

    fn fail(&self, code: IssueCode, default_message: String) -> Outcome {
        Outcome::Fail(code, self.message.clone().unwrap_or(default_message))
    }
}

struct Unit {
    noun: &'static str,
    item: &'static str
}

fn measure(value: &Value) -> Option<(usize, Unit)> {
    match value {
        Value::String(s) => Some((
            s.chars().count(),
            Unit {
                noun: "String",
                item: "character(s)"
            }
        )),
        Value::Array(items) => Some((
            items.len(),
            Unit {
                noun: "Array",
                item: "element(s)"
            }
        )),
        _ => None
    }
}

fn is_multiple(n: f64, step: f64) -> bool {
    if step == 0.0 {
        return false;
    }
    let remainder = (n % step).abs();
    remainder < EPSILON || (step.abs() - remainder).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn code_of(check: &Check, value: Value) -> Option<IssueCode> {
        match check.evaluate(&value) {
            Outcome::Fail(code, _) => Some(code),
            _ => None
        }
    }

    #[test]
    fn non_empty_rejects_empty_string() {
        let check = Check::new(CheckKind::NonEmpty);
        assert_eq!(code_of(&check, json!("")), Some(IssueCode::TooSmall));
        assert_eq!(code_of(&check, json!("a")), None);
    }

    #[test]
    fn length_bounds_apply_to_arrays() {
        let check = Check::new(CheckKind::MaxLength(2));
        assert_eq!(code_of(&check, json!([1, 2, 3])), Some(IssueCode::TooBig));
        assert_eq!(code_of(&check, json!([1, 2])), None);
    }

    #[test]
    fn exact_length_reports_direction() {
        let check = Check::new(CheckKind::Length(3));
        assert_eq!(code_of(&check, json!("ab")), Some(IssueCode::TooSmall));
        assert_eq!(code_of(&check, json!("abcd")), Some(IssueCode::TooBig));
        assert_eq!(code_of(&check, json!("abc")), None);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let check = Check::new(CheckKind::MaxLength(2));
        assert_eq!(code_of(&check, json!("йё")), None);
    }

    #[test]
    fn email_and_url_formats() {
        let email = Check::new(CheckKind::Email);
        assert_eq!(code_of(&email, json!("a@b.com")), None);
        assert_eq!(code_of(&email, json!("nope")), Some(IssueCode::InvalidString));

        let url = Check::new(CheckKind::Url);
        assert_eq!(code_of(&url, json!("https://example.com")), None);
        assert_eq!(code_of(&url, json!("not a url")), Some(IssueCode::InvalidString));
    }

    #[test]
    fn numeric_bounds() {
        assert_eq!(
            code_of(&Check::new(CheckKind::Gt(0.0)), json!(0)),
            Some(IssueCode::TooSmall)
        );
        assert_eq!(code_of(&Check::new(CheckKind::Gte(0.0)), json!(0)), None);
        assert_eq!(
            code_of(&Check::new(CheckKind::Lt(10.0)), json!(10)),
            Some(IssueCode::TooBig)
        );
        assert_eq!(code_of(&Check::new(CheckKind::Lte(10.0)), json!(10)), None);
    }

    #[test]
    fn multiple_of_handles_fractions() {
        let check = Check::new(CheckKind::MultipleOf(0.5));
        assert_eq!(code_of(&check, json!(2.5)), None);
        assert_eq!(code_of(&check, json!(2.3)), Some(IssueCode::NotMultipleOf));
    }

    #[test]
    fn bounds_ignore_other_types() {
        assert_eq!(code_of(&Check::new(CheckKind::Gt(5.0)), json!("x")), None);
        assert_eq!(code_of(&Check::new(CheckKind::MinLength(5)), json!(1)), None);
    }

    #[test]
    fn custom_message_overrides_default() {
        let check = Check::new(CheckKind::Gt(0.0)).with_message("must be positive");
        match check.evaluate(&json!(-1)) {
            Outcome::Fail(_, message) => assert_eq!(message, "must be positive"),
            _ => panic!("expected failure")
        }
    }

    #[test]
    fn refine_uses_predicate() {
        let check = Check::refine(|v| v.as_str() == Some("ok"), "must be ok");
        assert_eq!(code_of(&check, json!("ok")), None);
        assert_eq!(code_of(&check, json!("no")), Some(IssueCode::Custom));
    }

    #[test]
    fn async_refine_is_deferred() {
        let check = Check::refine_async(|_| async { true }, "never");
        assert!(check.is_async());
        assert!(matches!(check.evaluate(&json!(1)), Outcome::Deferred(..)));
    }

    #[test]
    fn later_min_replaces_non_empty() {
        let non_empty = Check::new(CheckKind::NonEmpty);
        assert!(non_empty.same_bound(&CheckKind::MinLength(3)));
        assert!(!non_empty.same_bound(&CheckKind::MaxLength(3)));
    }
}
