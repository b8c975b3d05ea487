// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Relation columns.
//!
//! Relation fields are excluded from both projections; a to-one relation's
//! value reaches validation through its [`foreign_key`](super::foreign_key)
//! shadow column instead.
//!
//! Many-to-many join tables default to
//! `{plural(this_table)}_{plural(target_table)}` with join columns
//! `{snake(this)}_id` and `{snake(target)}_id`, both referencing `id`.
//!
//! A polymorphic many-to-one field `owner` is stored in two columns,
//! `owner_type` and `owner_id`, indexed together. A
//! [`discriminator`](super::discriminator) field can expose the type column
//! to validation.

use convert_case::{Case, Casing};

use super::factory;
use crate::{
    column::{
        Annotation, Column, ColumnKind, ColumnOptions, ColumnSpec, FieldContext, IndexSpec,
        RelationKind, RelationOptions,
        kind::{ManyToMany, ManyToOne, OneToMany, OneToOne, PolymorphicManyToOne}
    },
    config::{LogicalType, plural},
    entity::EntitySchema,
    registry::{FieldType, Metadata},
    validate::{ObjectValidator, Type}
};

fn relation_annotation(relation: &RelationOptions, options: &ColumnOptions, ctx: &FieldContext<'_>) -> Annotation {
    Annotation::Relation {
        field:        ctx.field.to_string(),
        kind:         relation.kind,
        target:       relation.target.to_string(),
        inverse_side: relation.inverse_side.clone(),
        on_delete:    relation.on_delete,
        on_update:    relation.on_update,
        eager:        relation.eager,
        nullable:     options.nullable
    }
}

fn to_one_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    let Some(relation) = &options.relation else {
        return Vec::new();
    };
    vec![
        relation_annotation(relation, options, ctx),
        Annotation::JoinColumn {
            field:             ctx.field.to_string(),
            name:              ctx.column_name(options),
            referenced_column: relation
                .referenced_column
                .clone()
                .unwrap_or_else(|| "id".to_string()),
            constraint_name:   relation
                .constraint_name
                .clone()
                .unwrap_or_else(|| ctx.config.constraint_naming.name(ctx.table, ctx.field))
        }
    ]
}

fn one_to_many_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    options
        .relation
        .iter()
        .map(|relation| relation_annotation(relation, options, ctx))
        .collect()
}

fn many_to_many_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    let Some(relation) = &options.relation else {
        return Vec::new();
    };
    let join = relation.join_table.clone().unwrap_or_default();
    vec![
        relation_annotation(relation, options, ctx),
        Annotation::JoinTable {
            field:               ctx.field.to_string(),
            name:                join
                .name
                .unwrap_or_else(|| format!("{}_{}", plural(ctx.table), plural(relation.target_table))),
            join_column:         join
                .join_column
                .unwrap_or_else(|| format!("{}_id", ctx.entity.to_case(Case::Snake))),
            inverse_join_column: join
                .inverse_join_column
                .unwrap_or_else(|| format!("{}_id", relation.target.to_case(Case::Snake)))
        }
    ]
}

fn polymorphic_decorator(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    ctx.constraint_columns(options)
        .into_iter()
        .zip([LogicalType::String, LogicalType::Int32])
        .map(|(name, column_type)| Annotation::Column {
            field: ctx.field.to_string(),
            spec:  ColumnSpec {
                name,
                column_type: Some(ctx.config.typemap.resolve(column_type).to_string()),
                nullable: options.nullable,
                ..ColumnSpec::default()
            }
        })
        .collect()
}

fn relation<K: ColumnKind>(
    node: Type,
    relation: RelationOptions,
    decorator: fn(&ColumnOptions, &FieldContext<'_>) -> Vec<Annotation>
) -> Column<K> {
    let metadata = Metadata {
        field_type: FieldType::Relation,
        decorator_factory: factory(decorator),
        options: ColumnOptions {
            relation: Some(relation),
            ..ColumnOptions::default()
        },
        ..Metadata::default()
    };
    Column::build(node, metadata)
}

fn entity_node() -> Type {
    Type::object(ObjectValidator::new().passthrough())
}

/// Many-to-one relation to the entity `target` stored in `target_table`.
#[must_use]
pub fn many_to_one_named(target: &'static str, target_table: &'static str) -> Column<ManyToOne> {
    relation(
        entity_node(),
        RelationOptions::new(RelationKind::ManyToOne, target, target_table),
        to_one_decorator
    )
}

/// Many-to-one relation to `T`.
#[must_use]
pub fn many_to_one<T: EntitySchema>() -> Column<ManyToOne> {
    many_to_one_named(T::NAME, T::TABLE)
}

/// One-to-one relation to the entity `target` stored in `target_table`.
#[must_use]
pub fn one_to_one_named(target: &'static str, target_table: &'static str) -> Column<OneToOne> {
    relation(
        entity_node(),
        RelationOptions::new(RelationKind::OneToOne, target, target_table),
        to_one_decorator
    )
}

/// One-to-one relation to `T`.
#[must_use]
pub fn one_to_one<T: EntitySchema>() -> Column<OneToOne> {
    one_to_one_named(T::NAME, T::TABLE)
}

/// One-to-many relation, the inverse of the many-to-one field `inverse` on
/// `target`.
#[must_use]
pub fn one_to_many_named(
    target: &'static str,
    target_table: &'static str,
    inverse: impl Into<String>
) -> Column<OneToMany> {
    let mut options = RelationOptions::new(RelationKind::OneToMany, target, target_table);
    options.inverse_side = Some(inverse.into());
    relation(Type::array(entity_node()), options, one_to_many_decorator)
}

/// One-to-many relation to `T`, the inverse of its field `inverse`.
#[must_use]
pub fn one_to_many<T: EntitySchema>(inverse: impl Into<String>) -> Column<OneToMany> {
    one_to_many_named(T::NAME, T::TABLE, inverse)
}

/// Many-to-many relation to the entity `target` stored in `target_table`.
#[must_use]
pub fn many_to_many_named(target: &'static str, target_table: &'static str) -> Column<ManyToMany> {
    relation(
        Type::array(entity_node()),
        RelationOptions::new(RelationKind::ManyToMany, target, target_table),
        many_to_many_decorator
    )
}

/// Many-to-many relation to `T`.
#[must_use]
pub fn many_to_many<T: EntitySchema>() -> Column<ManyToMany> {
    many_to_many_named(T::NAME, T::TABLE)
}

/// Many-to-one relation to one entity of the `targets` types.
///
/// The field `base` is stored as `{base}_type` and `{base}_id`, covered by
/// one index. `unique()` makes that pair unique.
#[must_use]
pub fn polymorphic_many_to_one<I>(targets: I) -> Column<PolymorphicManyToOne>
where
    I: IntoIterator<Item = &'static str>
{
    let mut options = RelationOptions::new(RelationKind::PolymorphicManyToOne, "", "");
    options.targets = targets.into_iter().collect();
    let metadata = Metadata {
        field_type: FieldType::Relation,
        decorator_factory: factory(polymorphic_decorator),
        options: ColumnOptions {
            index: Some(IndexSpec::default()),
            relation: Some(options),
            ..ColumnOptions::default()
        },
        ..Metadata::default()
    };
    Column::build(entity_node(), metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        column::{ColumnDef, ReferentialAction},
        config::{Config, ConstraintNaming, ForeignKeyNaming}
    };

    fn annotate(column: impl Into<ColumnDef>, config: &Config, field: &str) -> Vec<Annotation> {
        let ctx = FieldContext {
            entity: "BlogPost",
            table: "blog_posts",
            field,
            config
        };
        column.into().annotations(&ctx)
    }

    #[test]
    fn relations_are_classified() {
        assert_eq!(many_to_one_named("User", "users").field_type(), FieldType::Relation);
        assert_eq!(one_to_many_named("Comment", "comments", "post").field_type(), FieldType::Relation);
        assert_eq!(many_to_many_named("Tag", "tags").field_type(), FieldType::Relation);
    }

    #[test]
    fn many_to_one_join_column_defaults() {
        let config = Config::new();
        let annotations = annotate(many_to_one_named("User", "users").cascade(), &config, "author");
        assert_eq!(annotations.len(), 2);
        match &annotations[0] {
            Annotation::Relation {
                kind,
                target,
                on_delete,
                ..
            } => {
                assert_eq!(*kind, RelationKind::ManyToOne);
                assert_eq!(target, "User");
                assert_eq!(*on_delete, Some(ReferentialAction::Cascade));
            }
            other => panic!("unexpected {:?}", other)
        }
        assert_eq!(annotations[1], Annotation::JoinColumn {
            field:             "author".to_string(),
            name:              "author_id".to_string(),
            referenced_column: "id".to_string(),
            constraint_name:   "FK_blogPosts_author".to_string()
        });
    }

    #[test]
    fn join_column_follows_configured_naming() {
        let config = Config::new()
            .with_foreign_key_naming(ForeignKeyNaming::Camel)
            .with_constraint_naming(ConstraintNaming::Camel);
        let annotations = annotate(one_to_one_named("Profile", "profiles"), &config, "main_profile");
        assert!(matches!(
            &annotations[1],
            Annotation::JoinColumn { name, constraint_name, .. }
                if name == "mainProfileId" && constraint_name == "FK_blogPosts_mainProfile"
        ));
    }

    #[test]
    fn explicit_foreign_key_and_index_use_it() {
        let config = Config::new();
        let column = many_to_one_named("User", "users").foreign_key("owner_ref").index();
        let annotations = annotate(column, &config, "owner");
        assert!(matches!(&annotations[1], Annotation::JoinColumn { name, .. } if name == "owner_ref"));
        assert!(matches!(
            &annotations[2],
            Annotation::Index { columns, .. } if columns == &vec!["owner_ref".to_string()]
        ));
    }

    #[test]
    fn one_to_many_has_no_join_column() {
        let config = Config::new();
        let annotations = annotate(one_to_many_named("Comment", "comments", "post"), &config, "comments");
        assert_eq!(annotations.len(), 1);
        assert!(matches!(
            &annotations[0],
            Annotation::Relation { inverse_side: Some(side), .. } if side == "post"
        ));
    }

    #[test]
    fn many_to_many_default_join_table() {
        let config = Config::new();
        let annotations = annotate(many_to_many_named("Tag", "tags"), &config, "tags");
        assert_eq!(annotations[1], Annotation::JoinTable {
            field:               "tags".to_string(),
            name:                "blog_posts_tags".to_string(),
            join_column:         "blog_post_id".to_string(),
            inverse_join_column: "tag_id".to_string()
        });
    }

    #[test]
    fn many_to_many_explicit_join_table() {
        let config = Config::new();
        let column = many_to_many_named("Tag", "tags").join_table("post_tags");
        let annotations = annotate(column, &config, "tags");
        assert!(matches!(&annotations[1], Annotation::JoinTable { name, .. } if name == "post_tags"));
    }

    #[test]
    fn polymorphic_relation_spans_type_and_id() {
        let config = Config::new();
        let column = polymorphic_many_to_one(["Post", "Comment"]);
        assert_eq!(column.field_type(), FieldType::Relation);
        assert_eq!(column.options().relation.unwrap().targets, vec!["Post", "Comment"]);

        let annotations = annotate(column, &config, "subject");
        assert_eq!(annotations.len(), 3);
        assert!(matches!(
            &annotations[0],
            Annotation::Column { field, spec } if field == "subject"
                && spec.name == "subject_type"
                && spec.column_type.as_deref() == Some("varchar")
        ));
        assert!(matches!(
            &annotations[1],
            Annotation::Column { spec, .. } if spec.name == "subject_id" && spec.column_type.as_deref() == Some("int")
        ));
        assert_eq!(annotations[2], Annotation::Index {
            name:    "IDX_blogPosts_subject".to_string(),
            columns: vec!["subject_type".to_string(), "subject_id".to_string()],
            unique:  false
        });
    }

    #[test]
    fn polymorphic_unique_spans_both_columns() {
        let config = Config::new();
        let column = polymorphic_many_to_one(["Post"]).nullable().unique();
        let annotations = annotate(column, &config, "subject");
        assert!(matches!(&annotations[0], Annotation::Column { spec, .. } if spec.nullable));
        assert!(matches!(
            &annotations[3],
            Annotation::Index { columns, unique: true, .. }
                if columns == &vec!["subject_type".to_string(), "subject_id".to_string()]
        ));
    }

    #[test]
    fn relation_nullable_follows_options() {
        let config = Config::new();
        let annotations = annotate(many_to_one_named("User", "users").optional(), &config, "editor");
        assert!(matches!(&annotations[0], Annotation::Relation { nullable: true, .. }));
    }
}
