// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column constructors.
//!
//! Each constructor builds the base validation node with its default
//! refinements, classifies the field, installs the decorator factory and
//! registers the metadata under a fresh root.
//!
//! # Constructors
//!
//! | Constructor | Node | Field type | Annotation |
//! |-------------|------|------------|------------|
//! | [`string`], [`text`] | non-empty string | Column | `Column` |
//! | [`int`], [`bigint`] | integer | Column | `Column` |
//! | [`int32`] | 32-bit integer | Column | `Column` |
//! | [`number`], [`float`], [`float32`], [`float64`], [`decimal`] | number | Column | `Column` |
//! | [`boolean`] | boolean | Column | `Column` with flag transformer |
//! | [`enum_type`] | enumeration | Column | `Column` with enum values |
//! | [`json`], [`jsonb`] | caller node | Column | `Column` |
//! | [`binary`] | byte array | Column | `Column` |
//! | [`date`], [`timestamp`] | date | Column | `Column` |
//! | [`create_date`], [`update_date`] | read-only date | Column | `CreateDateColumn`, `UpdateDateColumn` |
//! | [`primary`], [`primary_uuid`], [`primary_string`] | key | Column, Generated after `generated()` | `PrimaryColumn`, `PrimaryGeneratedColumn` |
//! | [`foreign_key`] | positive 32-bit integer | Column | `Column` |
//! | [`discriminator`] | non-empty string | Column | `Column` |
//! | [`many_to_one`], [`one_to_one`] | object | Relation | `Relation` + `JoinColumn` |
//! | [`one_to_many`] | array | Relation | `Relation` |
//! | [`many_to_many`] | array | Relation | `Relation` + `JoinTable` |
//! | [`polymorphic_many_to_one`] | object | Relation | two `Column`s + `Index` |
//! | [`derived`] | any | Column | `Column` |
//! | [`array`], [`column`] | caller node | Column | `Column` |

mod computed;
mod keys;
mod relation;
mod scalar;

use std::sync::Arc;

pub use computed::{array, column, derived};
pub use keys::{discriminator, foreign_key, primary, primary_string, primary_uuid};
pub use relation::{
    many_to_many, many_to_many_named, many_to_one, many_to_one_named, one_to_many,
    one_to_many_named, one_to_one, one_to_one_named, polymorphic_many_to_one
};
pub use scalar::{
    bigint, binary, boolean, create_date, date, decimal, enum_type, float, float32, float64, int,
    int32, json, jsonb, number, string, text, timestamp, update_date
};

use crate::column::{Annotation, ColumnOptions, ColumnSpec, DecoratorFactory, FieldContext};

/// Plain `Column` annotation.
pub(crate) fn column_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    vec![Annotation::Column {
        field: ctx.field.to_string(),
        spec:  ColumnSpec::resolve(options, ctx)
    }]
}

pub(crate) fn factory(
    decorator: fn(&ColumnOptions, &FieldContext<'_>) -> Vec<Annotation>
) -> Option<DecoratorFactory> {
    Some(Arc::new(decorator))
}
