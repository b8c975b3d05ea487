// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Primary and foreign keys.

use super::{column_decorator, factory};
use crate::{
    column::{
        Annotation, Column, ColumnOptions, ColumnSpec, FieldContext,
        kind::{Discriminator, ForeignKey, PrimaryKey}
    },
    config::{ColumnType, LogicalType},
    registry::Metadata,
    validate::Type
};

fn primary_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    let field = ctx.field.to_string();
    let spec = ColumnSpec::resolve(options, ctx);
    vec![match options.strategy {
        Some(strategy) => Annotation::PrimaryGeneratedColumn {
            field,
            strategy,
            spec
        },
        None => Annotation::PrimaryColumn { field, spec }
    }]
}

fn key(node: Type, column_type: impl Into<ColumnType>) -> Column<PrimaryKey> {
    let metadata = Metadata {
        decorator_factory: factory(primary_decorator),
        options: ColumnOptions {
            primary: true,
            ..ColumnOptions::typed(column_type)
        },
        ..Metadata::default()
    };
    Column::build(node, metadata)
}

/// Positive integer primary key.
///
/// Supplied by the caller until `generated()` hands it to the database.
#[must_use]
pub fn primary() -> Column<PrimaryKey> {
    key(Type::int32().positive(), LogicalType::Int32)
}

/// UUID primary key.
#[must_use]
pub fn primary_uuid() -> Column<PrimaryKey> {
    key(Type::uuid(), "uuid")
}

/// Non-empty string primary key.
#[must_use]
pub fn primary_string() -> Column<PrimaryKey> {
    key(Type::string().non_empty(), LogicalType::String)
}

/// Scalar foreign key shadowing the to-one relation field `relation`.
///
/// Before validation the lifecycle copies `relation.id` into this field when
/// the relation object is loaded and the key is absent.
#[must_use]
pub fn foreign_key(relation: impl Into<String>) -> Column<ForeignKey> {
    let metadata = Metadata {
        decorator_factory: factory(column_decorator),
        options: ColumnOptions {
            foreign_key_for: Some(relation.into()),
            ..ColumnOptions::typed(LogicalType::Int32)
        },
        ..Metadata::default()
    };
    Column::build(Type::int32().positive(), metadata)
}

/// Non-empty string naming the target type of the polymorphic relation
/// field `relation`.
#[must_use]
pub fn discriminator(relation: impl Into<String>) -> Column<Discriminator> {
    let metadata = Metadata {
        decorator_factory: factory(column_decorator),
        options: ColumnOptions {
            discriminator_for: Some(relation.into()),
            ..ColumnOptions::typed(LogicalType::String)
        },
        ..Metadata::default()
    };
    Column::build(Type::string().non_empty(), metadata)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        column::{ColumnDef, GenerationStrategy},
        config::Config,
        registry::FieldType,
        validate::{IssueCode, ObjectValidator, ParseOptions}
    };

    fn annotate(column: impl Into<ColumnDef>) -> Annotation {
        let config = Config::new();
        let ctx = FieldContext {
            entity: "Post",
            table:  "posts",
            field:  "id",
            config: &config
        };
        column.into().annotations(&ctx).remove(0)
    }

    #[test]
    fn plain_primary_is_required_column() {
        let column = primary();
        assert_eq!(column.field_type(), FieldType::Column);
        assert!(!column.node().is_optional());
        assert!(!column.node().is_nullable());
        assert!(column.options().primary);
        assert!(matches!(annotate(column), Annotation::PrimaryColumn { .. }));
    }

    #[test]
    fn generated_primary_annotation() {
        let column = primary().generated(GenerationStrategy::Increment);
        match annotate(column) {
            Annotation::PrimaryGeneratedColumn { strategy, spec, .. } => {
                assert_eq!(strategy, GenerationStrategy::Increment);
                assert_eq!(spec.column_type.as_deref(), Some("int"));
            }
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn uuid_primary_type() {
        match annotate(primary_uuid().generated(GenerationStrategy::Uuid)) {
            Annotation::PrimaryGeneratedColumn { spec, .. } => {
                assert_eq!(spec.column_type.as_deref(), Some("uuid"));
            }
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn foreign_key_shadows_relation() {
        let column = foreign_key("author");
        assert_eq!(column.field_type(), FieldType::Column);
        assert_eq!(column.options().foreign_key_for.as_deref(), Some("author"));
        assert!(matches!(annotate(column), Annotation::Column { .. }));
    }

    #[test]
    fn keys_stay_in_int_range() {
        let object = ObjectValidator::new()
            .field("id", primary().node().clone())
            .field("author_id", foreign_key("author").node().clone());
        let issues = object
            .safe_parse(&json!({"id": 1_i64 << 40, "author_id": 1_i64 << 40}), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|issue| issue.code == IssueCode::TooBig));
        assert!(object
            .safe_parse(&json!({"id": i32::MAX, "author_id": 1}), &ParseOptions::default())
            .is_ok());
    }

    #[test]
    fn discriminator_is_string_column() {
        let column = discriminator("subject");
        assert_eq!(column.field_type(), FieldType::Column);
        assert_eq!(column.options().discriminator_for.as_deref(), Some("subject"));
        match annotate(column) {
            Annotation::Column { spec, .. } => assert_eq!(spec.column_type.as_deref(), Some("varchar")),
            other => panic!("unexpected {:?}", other)
        }
    }
}
