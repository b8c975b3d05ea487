// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema container.
//!
//! A [`Schema`] is an ordered map of field names to columns plus derivations,
//! table-level indexes and unique constraints, and object-level checks.
//! Classification policy lives in [`projection`](crate::projection); the
//! container only resolves columns through a caller-supplied function.
//!
//! # Inheritance
//!
//! `parent.merge(&child)` yields a new schema: columns and derivations are
//! the union with the child winning on collisions, constraints and checks are
//! concatenated.
//!
//! # Example
//!
//! ```rust
//! use entity_schema::{columns, schema::Schema};
//! use serde_json::{Value, json};
//!
//! let mut post = Schema::new()
//!     .column("title", columns::string().max(120))
//!     .column("slug", columns::string().max(140));
//! post.derive("slug", |post| {
//!     let title = post.get("title").and_then(Value::as_str).unwrap_or_default();
//!     Ok(json!(title.to_lowercase().replace(' ', "-")))
//! })?;
//! assert!(post.is_derived("slug"));
//! # Ok::<(), entity_schema::error::ConfigError>(())
//! ```

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

use crate::{
    column::ColumnDef,
    error::{BoxError, ConfigError},
    validate::{Check, ObjectValidator, Record, Type}
};

type DeriveFn = Arc<dyn Fn(&Record) -> Result<Value, BoxError> + Send + Sync>;

/// Function computing a field from the rest of the entity.
#[derive(Clone)]
pub struct Derivation(DeriveFn);

impl Derivation {
    /// Wrap a derivation function.
    pub fn new<F>(derive: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, BoxError> + Send + Sync + 'static
    {
        Self(Arc::new(derive))
    }

    /// Wrap an infallible derivation function.
    pub fn infallible<F>(derive: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static
    {
        Self::new(move |record| Ok(derive(record)))
    }

    /// Compute the value for `record`.
    ///
    /// # Errors
    ///
    /// Whatever the function returns.
    pub fn apply(&self, record: &Record) -> Result<Value, BoxError> {
        (self.0)(record)
    }
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Derivation(..)")
    }
}

/// Table-level index or unique declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    /// Constraint name.
    pub name:    String,
    /// Field names covered.
    pub columns: Vec<String>
}

/// Field map with derivations and table-level constraints.
#[derive(Clone, Default)]
pub struct Schema {
    columns:     Vec<(String, ColumnDef)>,
    derivations: BTreeMap<String, Derivation>,
    indexes:     Vec<TableConstraint>,
    uniques:     Vec<TableConstraint>,
    checks:      Vec<Check>
}

/// Schema of `columns`, in order.
pub fn schema<I, S, C>(columns: I) -> Schema
where
    I: IntoIterator<Item = (S, C)>,
    S: Into<String>,
    C: Into<ColumnDef>
{
    columns
        .into_iter()
        .fold(Schema::new(), |schema, (name, column)| schema.column(name, column))
}

impl Schema {
    /// Empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the column `name`.
    ///
    /// A derived column registers its derivation under `name`; any other
    /// column drops a derivation left by the column it replaces.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, column: impl Into<ColumnDef>) -> Self {
        let name = name.into();
        let column = column.into();
        match column.derivation() {
            Some(derivation) => {
                self.derivations.insert(name.clone(), derivation);
            }
            None => {
                self.derivations.remove(&name);
            }
        }
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column))
        }
        self
    }

    /// Add derivations, replacing earlier ones for the same fields.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownDerivation`] when a field is not a column; no
    /// derivation is added in that case.
    pub fn with_derivations<I, S>(mut self, derivations: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, Derivation)>,
        S: Into<String>
    {
        let derivations: Vec<(String, Derivation)> = derivations
            .into_iter()
            .map(|(field, derivation)| (field.into(), derivation))
            .collect();
        if let Some((field, _)) = derivations.iter().find(|(field, _)| !self.contains(field)) {
            return Err(ConfigError::UnknownDerivation {
                field: field.clone()
            });
        }
        self.derivations.extend(derivations);
        Ok(self)
    }

    /// Derive `field` from the rest of the entity, in place.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownDerivation`] when `field` is not a column.
    pub fn derive<F>(&mut self, field: impl Into<String>, derive: F) -> Result<&mut Self, ConfigError>
    where
        F: Fn(&Record) -> Result<Value, BoxError> + Send + Sync + 'static
    {
        self.insert_derivation(field.into(), Derivation::new(derive))
    }

    /// Install a prepared derivation for `field`, in place.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownDerivation`] when `field` is not a column.
    pub fn insert_derivation(&mut self, field: String, derivation: Derivation) -> Result<&mut Self, ConfigError> {
        if !self.contains(&field) {
            return Err(ConfigError::UnknownDerivation { field });
        }
        self.derivations.insert(field, derivation);
        Ok(self)
    }

    /// Table-level index over `columns`.
    #[must_use]
    pub fn index<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.indexes.push(TableConstraint {
            name:    name.into(),
            columns: columns.into_iter().map(Into::into).collect()
        });
        self
    }

    /// Table-level unique constraint over `columns`.
    #[must_use]
    pub fn unique<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.uniques.push(TableConstraint {
            name:    name.into(),
            columns: columns.into_iter().map(Into::into).collect()
        });
        self
    }

    /// Object-level check run after the fields validate.
    #[must_use]
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// `self` with `other` layered on top.
    ///
    /// Columns and derivations of `other` replace same-named ones, and a
    /// column of `other` without a derivation drops the one `self` had.
    /// Indexes, uniques and checks of both are kept, `self`'s first.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (name, column) in &other.columns {
            if !other.derivations.contains_key(name) {
                merged.derivations.remove(name);
            }
            match merged.columns.iter_mut().find(|(existing, _)| existing == name) {
                Some(slot) => slot.1 = column.clone(),
                None => merged.columns.push((name.clone(), column.clone()))
            }
        }
        merged
            .derivations
            .extend(other.derivations.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.indexes.extend(other.indexes.iter().cloned());
        merged.uniques.extend(other.uniques.iter().cloned());
        merged.checks.extend(other.checks.iter().cloned());
        merged
    }

    /// Object validator of the fields for which `build` returns a node.
    ///
    /// Unknown keys are stripped; schema-level checks are carried over.
    pub fn resolve<F>(&self, mut build: F) -> ObjectValidator
    where
        F: FnMut(&ColumnDef, &str) -> Option<Type>
    {
        self.columns
            .iter()
            .filter_map(|(name, column)| build(column, name).map(|node| (name, node)))
            .fold(ObjectValidator::new(), |object, (name, node)| object.field(name.as_str(), node))
            .with_checks(self.checks.iter().cloned())
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnDef)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    /// Column `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, column)| column)
    }

    /// Whether `name` is a column.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Derivations by field.
    #[must_use]
    pub const fn derivations(&self) -> &BTreeMap<String, Derivation> {
        &self.derivations
    }

    /// Whether `field` is derived.
    #[must_use]
    pub fn is_derived(&self, field: &str) -> bool {
        self.derivations.contains_key(field)
    }

    /// Table-level indexes.
    #[must_use]
    pub fn indexes(&self) -> &[TableConstraint] {
        &self.indexes
    }

    /// Table-level unique constraints.
    #[must_use]
    pub fn uniques(&self) -> &[TableConstraint] {
        &self.uniques
    }

    /// Object-level checks.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("columns", &self.columns.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .field("derivations", &self.derivations.keys().collect::<Vec<_>>())
            .field("indexes", &self.indexes)
            .field("uniques", &self.uniques)
            .field("checks", &self.checks.len())
            .finish()
    }
}
