// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Scalar columns.

use super::{column_decorator, factory};
use crate::{
    column::{
        Annotation, BooleanTransformer, Column, ColumnOptions, ColumnSpec, FieldContext, Transformer,
        kind::{Binary, Date, Enumeration, Flag, Float, Integer, Json, Text, Timestamp}
    },
    config::{ColumnType, LogicalType},
    registry::Metadata,
    validate::Type
};

fn scalar(column_type: impl Into<ColumnType>) -> Metadata {
    Metadata {
        decorator_factory: factory(column_decorator),
        options: ColumnOptions::typed(column_type),
        ..Metadata::default()
    }
}

/// Non-empty VARCHAR string. `optional()` and `nullable()` lift the
/// non-empty requirement.
#[must_use]
pub fn string() -> Column<Text> {
    Column::build(Type::string().non_empty(), scalar(LogicalType::String))
}

/// Non-empty TEXT string.
#[must_use]
pub fn text() -> Column<Text> {
    Column::build(Type::string().non_empty(), scalar("text"))
}

/// Integer.
#[must_use]
pub fn int() -> Column<Integer> {
    Column::build(Type::int(), scalar(LogicalType::Number))
}

/// 32-bit integer.
#[must_use]
pub fn int32() -> Column<Integer> {
    Column::build(Type::int32(), scalar(LogicalType::Int32))
}

/// 64-bit integer.
#[must_use]
pub fn bigint() -> Column<Integer> {
    Column::build(Type::int(), scalar(LogicalType::BigInt))
}

/// Any number.
#[must_use]
pub fn number() -> Column<Float> {
    Column::build(Type::number(), scalar(LogicalType::Float))
}

fn sized(column_type: impl Into<ColumnType>, precision: Option<u32>, scale: Option<u32>) -> Column<Float> {
    let mut metadata = scalar(column_type);
    metadata.options.precision = precision;
    metadata.options.scale = scale;
    Column::build(Type::number(), metadata)
}

/// Float with optional precision and scale.
#[must_use]
pub fn float(precision: Option<u32>, scale: Option<u32>) -> Column<Float> {
    sized(LogicalType::Float, precision, scale)
}

/// Single precision float.
#[must_use]
pub fn float32() -> Column<Float> {
    sized(LogicalType::Float32, None, None)
}

/// Double precision float.
#[must_use]
pub fn float64() -> Column<Float> {
    sized(LogicalType::Float64, None, None)
}

/// DECIMAL number; size it with `precision()` and `scale()`.
#[must_use]
pub fn decimal() -> Column<Float> {
    sized("decimal", None, None)
}

/// Boolean stored as a loosely typed flag.
///
/// Reads `0`, `"0"`, `"false"` and `""` back as `false`.
#[must_use]
pub fn boolean() -> Column<Flag> {
    let mut metadata = scalar(LogicalType::Boolean);
    metadata.options.transformer = Some(Transformer::new(BooleanTransformer));
    Column::build(Type::boolean(), metadata)
}

/// One of `values`.
#[must_use]
pub fn enum_type<I, S>(values: I) -> Column<Enumeration>
where
    I: IntoIterator<Item = S>,
    S: Into<String>
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    let mut metadata = scalar(LogicalType::Enum);
    metadata.options.enum_values = Some(values.clone());
    Column::build(Type::enumeration(values), metadata)
}

/// JSON document validated by `node`.
#[must_use]
pub fn json(node: Type) -> Column<Json> {
    Column::build(node, scalar(LogicalType::Json))
}

/// Binary JSON document validated by `node`.
#[must_use]
pub fn jsonb(node: Type) -> Column<Json> {
    Column::build(node, scalar("jsonb"))
}

/// Binary payload.
#[must_use]
pub fn binary() -> Column<Binary> {
    Column::build(Type::binary(), scalar(LogicalType::Binary))
}

/// Date.
#[must_use]
pub fn date() -> Column<Date> {
    Column::build(Type::date(), scalar(LogicalType::Date))
}

/// Date and time.
#[must_use]
pub fn timestamp() -> Column<Date> {
    Column::build(Type::date(), scalar(LogicalType::Timestamp))
}

fn create_date_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    vec![Annotation::CreateDateColumn {
        field: ctx.field.to_string(),
        spec:  ColumnSpec::resolve(options, ctx)
    }]
}

fn update_date_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    vec![Annotation::UpdateDateColumn {
        field: ctx.field.to_string(),
        spec:  ColumnSpec::resolve(options, ctx)
    }]
}

fn maintained(decorator: fn(&ColumnOptions, &FieldContext<'_>) -> Vec<Annotation>) -> Column<Timestamp> {
    let metadata = Metadata {
        decorator_factory: factory(decorator),
        options: ColumnOptions::typed(LogicalType::Timestamp),
        ..Metadata::default()
    };
    Column::build(Type::date().readonly(), metadata)
}

/// Insert time, maintained by the ORM. Read-only.
#[must_use]
pub fn create_date() -> Column<Timestamp> {
    maintained(create_date_decorator)
}

/// Last update time, maintained by the ORM. Read-only.
#[must_use]
pub fn update_date() -> Column<Timestamp> {
    maintained(update_date_decorator)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        column::ColumnDef,
        config::Config,
        registry::FieldType,
        validate::{ObjectValidator, ParseOptions}
    };

    fn annotate(column: impl Into<ColumnDef>, field: &str) -> Vec<Annotation> {
        let config = Config::new();
        let ctx = FieldContext {
            entity: "Account",
            table: "accounts",
            field,
            config: &config
        };
        column.into().annotations(&ctx)
    }

    #[test]
    fn string_requires_content() {
        let node = string().node().clone();
        let object = ObjectValidator::new().field("name", node);
        assert!(object.safe_parse(&json!({"name": ""}), &ParseOptions::default()).is_err());
        assert!(object.safe_parse(&json!({"name": "a"}), &ParseOptions::default()).is_ok());
    }

    #[test]
    fn string_annotation_resolves_varchar() {
        let annotations = annotate(string().max(80), "name");
        match &annotations[0] {
            Annotation::Column { field, spec } => {
                assert_eq!(field, "name");
                assert_eq!(spec.column_type.as_deref(), Some("varchar"));
                assert_eq!(spec.length, Some(80));
                assert!(!spec.nullable);
            }
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn text_uses_literal_type() {
        let annotations = annotate(text(), "body");
        assert!(matches!(
            &annotations[0],
            Annotation::Column { spec, .. } if spec.column_type.as_deref() == Some("text")
        ));
    }

    #[test]
    fn int32_rejects_values_beyond_int() {
        let object = ObjectValidator::new().field("count", int32().node().clone());
        assert!(object.safe_parse(&json!({"count": 1_i64 << 40}), &ParseOptions::default()).is_err());
        assert!(object.safe_parse(&json!({"count": 40}), &ParseOptions::default()).is_ok());

        let object = ObjectValidator::new().field("count", bigint().node().clone());
        assert!(object.safe_parse(&json!({"count": 1_i64 << 40}), &ParseOptions::default()).is_ok());
    }

    #[test]
    fn boolean_installs_flag_transformer() {
        let column = boolean();
        let transformer = column.options().transformer.unwrap();
        assert_eq!(transformer.from_db(json!(0)), json!(false));
        assert_eq!(transformer.from_db(json!("yes")), json!(true));
    }

    #[test]
    fn enum_records_values() {
        let column = enum_type(["draft", "published"]);
        assert_eq!(
            column.options().enum_values,
            Some(vec!["draft".to_string(), "published".to_string()])
        );
    }

    #[test]
    fn float_initial_size() {
        let options = float(Some(8), Some(3)).options();
        assert_eq!((options.precision, options.scale), (Some(8), Some(3)));
    }

    #[test]
    fn timestamps_are_readonly_columns() {
        let created = create_date();
        assert!(created.node().is_readonly());
        assert_eq!(created.field_type(), FieldType::Column);
        assert!(matches!(
            annotate(created, "created_at")[0],
            Annotation::CreateDateColumn { .. }
        ));
        assert!(matches!(
            annotate(update_date(), "updated_at")[0],
            Annotation::UpdateDateColumn { .. }
        ));
    }

    #[test]
    fn kinds_recorded() {
        assert_eq!(string().metadata().kind, "string");
        assert_eq!(int32().metadata().kind, "int");
        assert_eq!(json(Type::any()).metadata().kind, "json");
    }
}
