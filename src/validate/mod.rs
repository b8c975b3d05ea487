// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Immutable, chainable validation nodes.
//!
//! A [`Type`] is one node of a validation chain. Every chain call returns a
//! new node with a fresh [`NodeId`]; nodes are never mutated. The only
//! exceptions are no-op calls (`optional()` on an already optional node and
//! the like), which hand back the receiver with its identity intact.
//!
//! # Value Model
//!
//! Values are [`serde_json::Value`]s. A key missing from an object is
//! "undefined"; an explicit JSON `null` is null.
//!
//! | Input | Required | `optional()` | `nullable()` | `default(v)` |
//! |-------|----------|--------------|--------------|--------------|
//! | missing | `required` issue | omitted | `required` issue | `v` |
//! | `null` | `invalid_type` | `invalid_type` | `null` | `invalid_type` |
//! | value | checked | checked | checked | checked |
//!
//! # Example
//!
//! ```rust
//! use entity_schema::validate::{ObjectValidator, ParseOptions, Type};
//! use serde_json::json;
//!
//! let user = ObjectValidator::new()
//!     .field("email", Type::string().email())
//!     .field("age", Type::int().gte(0.0).optional());
//!
//! let parsed = user.safe_parse(&json!({"email": "a@b.com"}), &ParseOptions::default());
//! assert!(parsed.is_ok());
//! ```

mod check;
mod issue;
mod object;

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering}
    }
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
pub use check::{AsyncPredicate, Check, CheckKind, Predicate};
pub use issue::{Issue, IssueCode, PathSegment};
pub use object::{ObjectValidator, ParseOptions, Record, UnknownKeys};
use serde_json::Value;
use uuid::Uuid;

use self::check::Outcome;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a validation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base shape a node accepts.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Any JSON value.
    Any,

    /// A string.
    String,

    /// A whole number.
    Int,

    /// Any number.
    Number,

    /// A boolean.
    Boolean,

    /// One of a fixed set of strings.
    Enum(Arc<[String]>),

    /// An RFC 3339 timestamp or `YYYY-MM-DD` date string.
    Date,

    /// A hyphenated or simple UUID string.
    Uuid,

    /// A string or an array of bytes.
    Binary,

    /// An array whose items match a node.
    Array(Box<Type>),

    /// A nested object.
    Object(Arc<ObjectValidator>)
}

impl Shape {
    /// Name used in `invalid_type` messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Int => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum(_) => "enum",
            Self::Date => "date",
            Self::Uuid => "uuid",
            Self::Binary => "binary",
            Self::Array(_) => "array",
            Self::Object(_) => "object"
        }
    }
}

/// Value substituted for a missing input.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Static(Value),

    /// A value computed on each use.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>)
}

impl DefaultValue {
    /// Produce the default.
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Factory(factory) => factory()
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)")
        }
    }
}

#[derive(Debug, Clone)]
struct TypeDef {
    shape:         Shape,
    checks:        Vec<Check>,
    optional:      bool,
    nullable:      bool,
    readonly:      bool,
    blank_to_null: bool,
    default:       Option<DefaultValue>
}

/// A validation node.
///
/// Cloning a `Type` keeps its identity; every chain method returns a node
/// with a new identity unless documented as a no-op.
#[derive(Debug, Clone)]
pub struct Type {
    id:  NodeId,
    def: Arc<TypeDef>
}

impl Type {
    /// Create a fresh node of the given shape.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            id:  NodeId::next(),
            def: Arc::new(TypeDef {
                shape,
                checks: Vec::new(),
                optional: false,
                nullable: false,
                readonly: false,
                blank_to_null: false,
                default: None
            })
        }
    }

    /// Any JSON value.
    #[must_use]
    pub fn any() -> Self {
        Self::new(Shape::Any)
    }

    /// A string.
    #[must_use]
    pub fn string() -> Self {
        Self::new(Shape::String)
    }

    /// A whole number.
    #[must_use]
    pub fn int() -> Self {
        Self::new(Shape::Int)
    }

    /// A whole number within the 32-bit signed range.
    #[must_use]
    pub fn int32() -> Self {
        Self::int()
            .gte(f64::from(i32::MIN))
            .lte(f64::from(i32::MAX))
    }

    /// Any number.
    #[must_use]
    pub fn number() -> Self {
        Self::new(Shape::Number)
    }

    /// A boolean.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(Shape::Boolean)
    }

    /// One of the given strings.
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self::new(Shape::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// A date or timestamp string.
    #[must_use]
    pub fn date() -> Self {
        Self::new(Shape::Date)
    }

    /// A UUID string.
    #[must_use]
    pub fn uuid() -> Self {
        Self::new(Shape::Uuid)
    }

    /// Binary payload.
    #[must_use]
    pub fn binary() -> Self {
        Self::new(Shape::Binary)
    }

    /// An array of `item`.
    #[must_use]
    pub fn array(item: Type) -> Self {
        Self::new(Shape::Array(Box::new(item)))
    }

    /// A nested object.
    #[must_use]
    pub fn object(validator: ObjectValidator) -> Self {
        Self::new(Shape::Object(Arc::new(validator)))
    }

    /// Identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Base shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.def.shape
    }

    /// Attached checks in evaluation order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.def.checks
    }

    /// Whether a missing input is accepted.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.def.optional || self.def.default.is_some()
    }

    /// Whether `null` is accepted.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.def.nullable
    }

    /// Whether the node is marked read-only.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.def.readonly
    }

    /// Whether a default is attached.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.def.default.is_some()
    }

    /// Resolve the attached default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.def.default.as_ref().map(DefaultValue::resolve)
    }

    /// Whether any check needs an async parse.
    #[must_use]
    pub fn has_async_checks(&self) -> bool {
        self.def.checks.iter().any(Check::is_async)
            || match &self.def.shape {
                Shape::Array(item) => item.has_async_checks(),
                Shape::Object(object) => object.has_async_checks(),
                _ => false
            }
    }

    fn derive(&self, edit: impl FnOnce(&mut TypeDef)) -> Self {
        let mut def = (*self.def).clone();
        edit(&mut def);
        Self {
            id:  NodeId::next(),
            def: Arc::new(def)
        }
    }

    /// The same node under a new identity.
    #[must_use]
    pub fn fresh(&self) -> Self {
        self.derive(|_| {})
    }

    /// Accept a missing input. No-op when already optional.
    #[must_use]
    pub fn optional(&self) -> Self {
        if self.def.optional {
            return self.clone();
        }
        self.derive(|def| def.optional = true)
    }

    /// Reject a missing input again.
    #[must_use]
    pub fn required(&self) -> Self {
        if !self.def.optional && self.def.default.is_none() {
            return self.clone();
        }
        self.derive(|def| {
            def.optional = false;
            def.default = None;
        })
    }

    /// Accept `null`. No-op when already nullable.
    #[must_use]
    pub fn nullable(&self) -> Self {
        if self.def.nullable {
            return self.clone();
        }
        self.derive(|def| def.nullable = true)
    }

    /// Substitute `value` for a missing input.
    #[must_use]
    pub fn default(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.derive(|def| def.default = Some(DefaultValue::Static(value)))
    }

    /// Substitute a freshly computed value for a missing input.
    #[must_use]
    pub fn default_with<F>(&self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static
    {
        self.derive(|def| def.default = Some(DefaultValue::Factory(Arc::new(factory))))
    }

    /// Mark read-only. No-op when already read-only.
    #[must_use]
    pub fn readonly(&self) -> Self {
        if self.def.readonly {
            return self.clone();
        }
        self.derive(|def| def.readonly = true)
    }

    /// Trim strings and read blank ones as `null`. No-op when already set.
    #[must_use]
    pub fn blank_as_null(&self) -> Self {
        if self.def.blank_to_null {
            return self.clone();
        }
        self.derive(|def| def.blank_to_null = true)
    }

    /// Append a check.
    ///
    /// Length bounds replace an earlier bound of the same kind.
    #[must_use]
    pub fn check(&self, check: Check) -> Self {
        self.derive(|def| {
            def.checks.retain(|existing| !existing.same_bound(check.kind()));
            def.checks.push(check);
        })
    }

    /// Drop the default non-empty bound. No-op when there is none.
    #[must_use]
    pub fn allow_empty(&self) -> Self {
        if !self.def.checks.iter().any(|c| matches!(c.kind(), CheckKind::NonEmpty)) {
            return self.clone();
        }
        self.derive(|def| {
            def.checks.retain(|c| !matches!(c.kind(), CheckKind::NonEmpty));
        })
    }

    /// Require a non-empty string or array.
    #[must_use]
    pub fn non_empty(&self) -> Self {
        self.check(Check::new(CheckKind::NonEmpty))
    }

    /// Minimum length.
    #[must_use]
    pub fn min_length(&self, min: usize) -> Self {
        self.check(Check::new(CheckKind::MinLength(min)))
    }

    /// Maximum length.
    #[must_use]
    pub fn max_length(&self, max: usize) -> Self {
        self.check(Check::new(CheckKind::MaxLength(max)))
    }

    /// Exact length.
    #[must_use]
    pub fn length(&self, len: usize) -> Self {
        self.check(Check::new(CheckKind::Length(len)))
    }

    /// Email address format.
    #[must_use]
    pub fn email(&self) -> Self {
        self.check(Check::new(CheckKind::Email))
    }

    /// URL format.
    #[must_use]
    pub fn url(&self) -> Self {
        self.check(Check::new(CheckKind::Url))
    }

    /// Strictly greater than `bound`.
    #[must_use]
    pub fn gt(&self, bound: f64) -> Self {
        self.check(Check::new(CheckKind::Gt(bound)))
    }

    /// Greater than or equal to `bound`.
    #[must_use]
    pub fn gte(&self, bound: f64) -> Self {
        self.check(Check::new(CheckKind::Gte(bound)))
    }

    /// Strictly less than `bound`.
    #[must_use]
    pub fn lt(&self, bound: f64) -> Self {
        self.check(Check::new(CheckKind::Lt(bound)))
    }

    /// Less than or equal to `bound`.
    #[must_use]
    pub fn lte(&self, bound: f64) -> Self {
        self.check(Check::new(CheckKind::Lte(bound)))
    }

    /// Greater than zero.
    #[must_use]
    pub fn positive(&self) -> Self {
        self.gt(0.0)
    }

    /// Zero or greater.
    #[must_use]
    pub fn nonnegative(&self) -> Self {
        self.gte(0.0)
    }

    /// Multiple of `step`.
    #[must_use]
    pub fn multiple_of(&self, step: f64) -> Self {
        self.check(Check::new(CheckKind::MultipleOf(step)))
    }

    /// Custom synchronous predicate.
    #[must_use]
    pub fn refine<F>(&self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static
    {
        self.check(Check::refine(predicate, message))
    }

    /// Custom asynchronous predicate.
    #[must_use]
    pub fn refine_async<F, Fut>(&self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = bool> + Send + 'static
    {
        self.check(Check::refine_async(predicate, message))
    }

    /// Validate `input` at `path`, pushing issues into `cx`.
    ///
    /// Returns the output value, or `None` when the field should be omitted.
    pub(crate) fn parse_at(
        &self,
        input: Option<&Value>,
        path: &mut Vec<PathSegment>,
        cx: &mut ParseContext
    ) -> Option<Value> {
        let defaulted;
        let input = match input {
            None => match &self.def.default {
                Some(default) => {
                    defaulted = default.resolve();
                    &defaulted
                }
                None if self.def.optional => return None,
                None => {
                    cx.push(path, IssueCode::Required, "Required".to_string(), None);
                    return None;
                }
            },
            Some(value) => value
        };

        let normalized;
        let input = match input {
            Value::String(s) if self.def.blank_to_null => {
                let trimmed = s.trim();
                normalized = if trimmed.is_empty() {
                    Value::Null
                } else {
                    Value::String(trimmed.to_string())
                };
                &normalized
            }
            other => other
        };

        if input.is_null() {
            if self.def.nullable {
                return Some(Value::Null);
            }
            cx.push(
                path,
                IssueCode::InvalidType,
                format!("Expected {}, received null", self.def.shape.name()),
                Some(input)
            );
            return None;
        }

        let output = self.parse_shape(input, path, cx)?;
        for check in &self.def.checks {
            match check.evaluate(&output) {
                Outcome::Pass => {}
                Outcome::Fail(code, message) => cx.push(path, code, message, Some(&output)),
                Outcome::Deferred(predicate, message) => {
                    cx.defer(path, predicate, message, &output);
                }
            }
        }
        Some(output)
    }

    fn parse_shape(
        &self,
        input: &Value,
        path: &mut Vec<PathSegment>,
        cx: &mut ParseContext
    ) -> Option<Value> {
        let shape = &self.def.shape;
        let accepted = match (shape, input) {
            (Shape::Any, _) => true,
            (Shape::String, Value::String(_)) => true,
            (Shape::Number, Value::Number(_)) => true,
            (Shape::Int, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (Shape::Boolean, Value::Bool(_)) => true,
            (Shape::Enum(values), Value::String(s)) => {
                if values.iter().any(|v| v == s) {
                    true
                } else {
                    let expected = values
                        .iter()
                        .map(|v| format!("'{}'", v))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    cx.push(
                        path,
                        IssueCode::InvalidEnumValue,
                        format!("Invalid enum value. Expected {}, received '{}'", expected, s),
                        Some(input)
                    );
                    return None;
                }
            }
            (Shape::Date, Value::String(s)) => {
                if is_date(s) {
                    true
                } else {
                    cx.push(path, IssueCode::InvalidString, "Invalid date".to_string(), Some(input));
                    return None;
                }
            }
            (Shape::Uuid, Value::String(s)) => {
                if Uuid::parse_str(s).is_ok() {
                    true
                } else {
                    cx.push(path, IssueCode::InvalidString, "Invalid uuid".to_string(), Some(input));
                    return None;
                }
            }
            (Shape::Binary, Value::String(_)) => true,
            (Shape::Binary, Value::Array(bytes)) => bytes
                .iter()
                .all(|b| b.as_u64().is_some_and(|b| b <= u64::from(u8::MAX))),
            (Shape::Array(item), Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, value) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    let parsed = item.parse_at(Some(value), path, cx);
                    path.pop();
                    out.push(parsed.unwrap_or(Value::Null));
                }
                return Some(Value::Array(out));
            }
            (Shape::Object(object), Value::Object(_)) => {
                return object.parse_at(input, path, cx).map(Value::Object);
            }
            _ => false
        };

        if accepted {
            Some(input.clone())
        } else {
            cx.push(
                path,
                IssueCode::InvalidType,
                format!("Expected {}, received {}", shape.name(), received(input)),
                Some(input)
            );
            None
        }
    }
}

fn is_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn received(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object"
    }
}

/// Whether a parse may await async refinements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseMode {
    Sync,
    Async
}

pub(crate) struct Deferred {
    pub path:      Vec<PathSegment>,
    pub predicate: AsyncPredicate,
    pub message:   String,
    pub value:     Value
}

/// Mutable state of one parse pass.
pub(crate) struct ParseContext {
    pub issues:   Vec<Issue>,
    pub deferred: Vec<Deferred>,
    mode:         ParseMode,
    report_input: bool
}

impl ParseContext {
    pub fn new(mode: ParseMode, options: &ParseOptions) -> Self {
        Self {
            issues: Vec::new(),
            deferred: Vec::new(),
            mode,
            report_input: options.report_input
        }
    }

    pub fn push(
        &mut self,
        path: &[PathSegment],
        code: IssueCode,
        message: String,
        input: Option<&Value>
    ) {
        let mut issue = Issue::new(path.to_vec(), code, message);
        if self.report_input {
            issue.input = input.cloned();
        }
        self.issues.push(issue);
    }

    fn defer(&mut self, path: &[PathSegment], predicate: AsyncPredicate, message: String, value: &Value) {
        match self.mode {
            ParseMode::Async => self.deferred.push(Deferred {
                path: path.to_vec(),
                predicate,
                message,
                value: value.clone()
            }),
            ParseMode::Sync => self.push(
                path,
                IssueCode::Custom,
                "Asynchronous refinement encountered during synchronous parse".to_string(),
                Some(value)
            )
        }
    }

    pub fn input_for(&self, value: &Value) -> Option<Value> {
        self.report_input.then(|| value.clone())
    }
}
