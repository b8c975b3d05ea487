// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Object validators and the parse entry points.

use serde_json::{Map, Value};

use super::{Check, Issue, IssueCode, ParseContext, ParseMode, PathSegment, Type, received};
use crate::validate::check::Outcome;

/// An entity record: field name to JSON value.
pub type Record = Map<String, Value>;

/// Handling of input keys an object does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Drop them from the output.
    #[default]
    Strip,

    /// Copy them to the output unchecked.
    Passthrough,

    /// Report an `unrecognized_keys` issue.
    Strict
}

/// Per-parse switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Attach the offending input to each issue.
    pub report_input: bool
}

impl ParseOptions {
    /// Options that attach offending inputs to issues.
    #[must_use]
    pub const fn reporting_input() -> Self {
        Self {
            report_input: true
        }
    }
}

/// Ordered field map plus object-level checks.
#[derive(Debug, Clone, Default)]
pub struct ObjectValidator {
    fields:       Vec<(String, Type)>,
    unknown_keys: UnknownKeys,
    checks:       Vec<Check>
}

impl ObjectValidator {
    /// Empty validator in [`UnknownKeys::Strip`] mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. A repeated name replaces the earlier node in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = ty,
            None => self.fields.push((name, ty))
        }
        self
    }

    /// Set the unknown-key mode.
    #[must_use]
    pub const fn unknown_keys(mut self, mode: UnknownKeys) -> Self {
        self.unknown_keys = mode;
        self
    }

    /// Shorthand for [`UnknownKeys::Strict`].
    #[must_use]
    pub const fn strict(self) -> Self {
        self.unknown_keys(UnknownKeys::Strict)
    }

    /// Shorthand for [`UnknownKeys::Passthrough`].
    #[must_use]
    pub const fn passthrough(self) -> Self {
        self.unknown_keys(UnknownKeys::Passthrough)
    }

    /// Add an object-level check.
    ///
    /// Object checks run only when every field parsed cleanly.
    #[must_use]
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Add several object-level checks.
    #[must_use]
    pub fn with_checks(mut self, checks: impl IntoIterator<Item = Check>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Declared fields in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Node declared for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, ty)| ty)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Unknown-key mode.
    #[must_use]
    pub const fn mode(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Object-level checks.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Whether any field or object check needs an async parse.
    #[must_use]
    pub fn has_async_checks(&self) -> bool {
        self.checks.iter().any(Check::is_async)
            || self.fields.iter().any(|(_, ty)| ty.has_async_checks())
    }

    /// Validate synchronously.
    ///
    /// Async refinements cannot run here and are reported as issues.
    ///
    /// # Errors
    ///
    /// Every independent issue found in the pass.
    pub fn safe_parse(&self, input: &Value, options: &ParseOptions) -> Result<Record, Vec<Issue>> {
        let mut cx = ParseContext::new(ParseMode::Sync, options);
        let output = self.parse_at(input, &mut Vec::new(), &mut cx);
        finish(output, cx.issues)
    }

    /// Validate, awaiting async refinements one after another.
    ///
    /// # Errors
    ///
    /// Every independent issue found in the pass.
    pub async fn safe_parse_async(
        &self,
        input: &Value,
        options: &ParseOptions
    ) -> Result<Record, Vec<Issue>> {
        let mut cx = ParseContext::new(ParseMode::Async, options);
        let output = self.parse_at(input, &mut Vec::new(), &mut cx);

        for deferred in std::mem::take(&mut cx.deferred) {
            if !(deferred.predicate)(deferred.value.clone()).await {
                cx.push(
                    &deferred.path,
                    IssueCode::Custom,
                    deferred.message,
                    Some(&deferred.value)
                );
            }
        }
        finish(output, cx.issues)
    }

    pub(crate) fn parse_at(
        &self,
        input: &Value,
        path: &mut Vec<PathSegment>,
        cx: &mut ParseContext
    ) -> Option<Record> {
        let Value::Object(object) = input else {
            cx.push(
                path,
                IssueCode::InvalidType,
                format!("Expected object, received {}", received(input)),
                Some(input)
            );
            return None;
        };

        let issues_before = cx.issues.len();
        let mut output = Record::new();

        for (name, ty) in &self.fields {
            path.push(PathSegment::Key(name.clone()));
            if let Some(value) = ty.parse_at(object.get(name), path, cx) {
                output.insert(name.clone(), value);
            }
            path.pop();
        }

        let unknown: Vec<&String> = object.keys().filter(|key| !self.contains(key)).collect();
        match self.unknown_keys {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => {
                for key in unknown {
                    if let Some(value) = object.get(key) {
                        output.insert(key.clone(), value.clone());
                    }
                }
            }
            UnknownKeys::Strict if !unknown.is_empty() => {
                let keys = unknown
                    .iter()
                    .map(|key| format!("'{}'", key))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut issue = Issue::new(
                    path.clone(),
                    IssueCode::UnrecognizedKeys,
                    format!("Unrecognized key(s) in object: {}", keys)
                );
                issue.input = cx.input_for(input);
                cx.issues.push(issue);
            }
            UnknownKeys::Strict => {}
        }

        if cx.issues.len() == issues_before && !self.checks.is_empty() {
            let value = Value::Object(output.clone());
            for check in &self.checks {
                match check.evaluate(&value) {
                    Outcome::Pass => {}
                    Outcome::Fail(code, message) => cx.push(path, code, message, None),
                    Outcome::Deferred(predicate, message) => {
                        cx.defer(path, predicate, message, &value);
                    }
                }
            }
        }

        Some(output)
    }
}

fn finish(output: Option<Record>, issues: Vec<Issue>) -> Result<Record, Vec<Issue>> {
    if issues.is_empty() {
        Ok(output.unwrap_or_default())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering}
    };

    use serde_json::json;

    use super::*;

    fn user() -> ObjectValidator {
        ObjectValidator::new()
            .field("email", Type::string().email())
            .field("age", Type::int().gte(0.0).optional())
    }

    #[test]
    fn parses_valid_object() {
        let record = user()
            .safe_parse(&json!({"email": "a@b.com", "age": 3}), &ParseOptions::default())
            .unwrap();
        assert_eq!(record["email"], "a@b.com");
        assert_eq!(record["age"], 3);
    }

    #[test]
    fn reports_every_field_issue() {
        let issues = user()
            .safe_parse(&json!({"age": -1}), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field(), Some("email"));
        assert_eq!(issues[1].field(), Some("age"));
    }

    #[test]
    fn rejects_non_objects() {
        let issues = user()
            .safe_parse(&json!([1]), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues[0].code, IssueCode::InvalidType);
        assert!(issues[0].path.is_empty());
    }

    #[test]
    fn strip_drops_unknown_keys() {
        let record = user()
            .safe_parse(&json!({"email": "a@b.com", "extra": 1}), &ParseOptions::default())
            .unwrap();
        assert!(!record.contains_key("extra"));
    }

    #[test]
    fn passthrough_keeps_unknown_keys() {
        let record = user()
            .passthrough()
            .safe_parse(&json!({"email": "a@b.com", "extra": 1}), &ParseOptions::default())
            .unwrap();
        assert_eq!(record["extra"], 1);
    }

    #[test]
    fn strict_reports_unknown_keys() {
        let issues = user()
            .strict()
            .safe_parse(&json!({"email": "a@b.com", "extra": 1}), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::UnrecognizedKeys);
        assert!(issues[0].message.contains("'extra'"));
    }

    #[test]
    fn report_input_attaches_values() {
        let issues = user()
            .safe_parse(&json!({"email": "nope"}), &ParseOptions::reporting_input())
            .unwrap_err();
        assert_eq!(issues[0].input, Some(json!("nope")));

        let issues = user()
            .safe_parse(&json!({"email": "nope"}), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues[0].input, None);
    }

    #[test]
    fn field_replaces_existing_name_in_place() {
        let validator = user().field("email", Type::string());
        let names: Vec<&str> = validator.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["email", "age"]);
        assert!(validator.get("email").unwrap().checks().is_empty());
    }

    #[test]
    fn object_checks_run_after_clean_fields() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let validator = user().check(Check::refine(
            move |value| {
                seen.fetch_add(1, Ordering::SeqCst);
                value.get("age").is_some()
            },
            "age is required here"
        ));

        let issues = validator
            .safe_parse(&json!({"email": "a@b.com"}), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues[0].message, "age is required here");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let _ = validator.safe_parse(&json!({}), &ParseOptions::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nested_objects_report_full_paths() {
        let validator = ObjectValidator::new().field(
            "profile",
            Type::object(ObjectValidator::new().field("name", Type::string()))
        );
        let issues = validator
            .safe_parse(&json!({"profile": {}}), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues[0].path_string(), "profile.name");
    }

    #[tokio::test]
    async fn async_refinements_are_awaited() {
        let validator = ObjectValidator::new().field(
            "username",
            Type::string().refine_async(
                |value| async move { value.as_str() != Some("taken") },
                "Username is taken"
            )
        );
        assert!(validator.has_async_checks());

        let ok = validator
            .safe_parse_async(&json!({"username": "free"}), &ParseOptions::default())
            .await;
        assert!(ok.is_ok());

        let issues = validator
            .safe_parse_async(&json!({"username": "taken"}), &ParseOptions::default())
            .await
            .unwrap_err();
        assert_eq!(issues[0].message, "Username is taken");
        assert_eq!(issues[0].field(), Some("username"));
    }
}
