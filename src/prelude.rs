// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use entity_schema::prelude::*;
//! ```

#[cfg(feature = "derive")]
pub use crate::Entity;
pub use crate::{
    adapter::{HookSet, PersistenceAdapter, RecordingAdapter},
    async_trait,
    column::{
        Annotation, Column, ColumnDef, ColumnOptions, FieldContext, GenerationStrategy,
        ReferentialAction
    },
    columns,
    config::{Config, Dialect, ForeignKeyNaming},
    entity::{EntityOptions, EntitySchema, NoParent, register},
    error::{ConfigError, Error, ValidationError},
    lifecycle::{ValidationHooks, validate_insert_record, validate_update_record},
    projection::{collect_schema, insert_schema, update_schema},
    registry::FieldType,
    schema::{Schema, schema},
    validate::{Check, Issue, ObjectValidator, ParseOptions, Record, Type}
};
