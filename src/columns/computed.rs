// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Derived, array and raw columns.

use serde_json::Value;

use super::{column_decorator, factory};
use crate::{
    column::{
        Column, ColumnOptions,
        kind::{Derived, Raw}
    },
    config::ColumnType,
    error::BoxError,
    registry::Metadata,
    schema::Derivation,
    validate::{Record, Type}
};

/// Persisted field computed from the rest of the entity.
///
/// The field is left out of the first validation pass; its value is computed
/// after it and checked in the second. Schemas pick the derivation up
/// automatically.
#[must_use]
pub fn derived<F>(derive: F) -> Column<Derived>
where
    F: Fn(&Record) -> Result<Value, BoxError> + Send + Sync + 'static
{
    let metadata = Metadata {
        decorator_factory: factory(column_decorator),
        derive: Some(Derivation::new(derive)),
        ..Metadata::default()
    };
    Column::build(Type::any(), metadata)
}

/// Array column of `item` values stored as `column_type`, e.g. `"text[]"`.
#[must_use]
pub fn array(column_type: impl Into<ColumnType>, item: Type) -> Column<Raw> {
    column(Type::array(item), column_type)
}

/// Column validated by an arbitrary `node`.
#[must_use]
pub fn column(node: Type, column_type: impl Into<ColumnType>) -> Column<Raw> {
    let metadata = Metadata {
        decorator_factory: factory(column_decorator),
        options: ColumnOptions::typed(column_type),
        ..Metadata::default()
    };
    Column::build(node, metadata)
}
