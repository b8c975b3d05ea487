// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Insert and update projections.
//!
//! A projection turns a [`Schema`] into a plain [`ObjectValidator`] for one
//! operation. Both projections strip unknown keys.
//!
//! | Column | Insert | Update |
//! |--------|--------|--------|
//! | read-only node | omitted | omitted |
//! | `options.generated` set | omitted | omitted |
//! | derived field | omitted | omitted |
//! | [`FieldType::Relation`] | omitted | omitted |
//! | [`FieldType::Generated`] | optional | omitted |
//! | [`FieldType::Column`] | as declared | as declared |
//!
//! Update does not relax plain columns to optional: it re-validates the
//! whole entity after the caller's changes were applied to it.
//!
//! The revalidation projections used after derivations run are the same
//! except that derived fields are included with their own node.

use std::fmt;

use crate::{
    column::{ColumnDef, ColumnOptions},
    entity::EntitySchema,
    registry::FieldType,
    schema::Schema,
    validate::{ObjectValidator, Type}
};

/// Entity write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Insert of a new entity.
    Insert,

    /// Update of a loaded entity.
    Update
}

impl Operation {
    /// First-pass validator of `schema`.
    #[must_use]
    pub fn project(self, schema: &Schema) -> ObjectValidator {
        project(schema, self, false)
    }

    /// Second-pass validator of `schema`, run after derivations.
    #[must_use]
    pub fn revalidation(self, schema: &Schema) -> ObjectValidator {
        project(schema, self, true)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update"
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn project(schema: &Schema, operation: Operation, with_derived: bool) -> ObjectValidator {
    schema.resolve(|column, key| {
        if column.is_readonly() || column.options().generated.is_some() {
            return None;
        }
        if schema.is_derived(key) && !with_derived {
            return None;
        }
        match (column.field_type(), operation) {
            (FieldType::Relation, _) | (FieldType::Generated, Operation::Update) => None,
            (FieldType::Generated, Operation::Insert) => Some(column.node().optional()),
            (FieldType::Column, _) => Some(column.node().clone())
        }
    })
}

/// Validator for inserts of entities described by `schema`.
#[must_use]
pub fn insert_schema(schema: &Schema) -> ObjectValidator {
    Operation::Insert.project(schema)
}

/// Validator for updates of entities described by `schema`.
#[must_use]
pub fn update_schema(schema: &Schema) -> ObjectValidator {
    Operation::Update.project(schema)
}

/// Classification of `column`.
#[must_use]
pub fn field_type(column: &ColumnDef) -> FieldType {
    column.field_type()
}

/// Persistence options of `column`.
#[must_use]
pub fn column_options(column: &ColumnDef) -> ColumnOptions {
    column.options()
}

/// Merged schema of `E`: its ancestors' schemas with `E`'s own on top.
///
/// An entity without an own schema inherits its parent's unchanged; the
/// chain ends in an empty schema.
#[must_use]
pub fn collect_schema<E: EntitySchema>() -> Schema {
    if E::IS_ROOT {
        return Schema::new();
    }
    let inherited = collect_schema::<E::Parent>();
    match E::own_schema() {
        Some(own) if inherited.is_empty() => own.clone(),
        Some(own) => inherited.merge(own),
        None => inherited
    }
}

/// Node of `key` in the insert projection, if included.
#[must_use]
pub fn insert_node(schema: &Schema, key: &str) -> Option<Type> {
    insert_schema(schema).get(key).cloned()
}
