// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entities and their registration with an ORM.
//!
//! An entity is a type implementing [`EntitySchema`]: a name, a table, an
//! optional own [`Schema`] and a parent whose schema it extends. The derive
//! macro writes the impl; hand-written impls work the same way.
//!
//! ```text
//! EntitySchema ──► collect_schema ──► register ──► PersistenceAdapter
//!   (own schema)     (merged)           │            Entity / Column / Index …
//!                                       └──────────► HookSet (insert, update, load)
//! ```
//!
//! # Inheritance
//!
//! `type Parent` points at the entity whose schema is merged underneath.
//! Chains end at [`NoParent`]. A mixin (`MIXIN = true`) only carries fields
//! for others to inherit and cannot be registered itself.
//!
//! # Example
//!
//! ```rust
//! use std::sync::OnceLock;
//!
//! use entity_schema::{
//!     adapter::RecordingAdapter,
//!     columns,
//!     config::Config,
//!     entity::{EntitySchema, NoParent, register},
//!     schema::Schema
//! };
//!
//! struct Tag;
//!
//! impl EntitySchema for Tag {
//!     type Parent = NoParent;
//!     const NAME: &'static str = "Tag";
//!     const TABLE: &'static str = "tags";
//!
//!     fn own_schema() -> Option<&'static Schema> {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         Some(SCHEMA.get_or_init(|| Schema::new().column("label", columns::string().unique())))
//!     }
//! }
//!
//! let mut orm = RecordingAdapter::new();
//! register::<Tag>(&mut orm, &Config::new())?;
//! assert!(orm.hooks("Tag").is_some());
//! # Ok::<(), entity_schema::error::Error>(())
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, trace};

use crate::{
    adapter::{HookSet, PersistenceAdapter, record_hook},
    column::{Annotation, FieldContext, RelationKind},
    config::Config,
    error::{ConfigError, Result},
    lifecycle,
    projection::collect_schema,
    schema::{Schema, TableConstraint},
    validate::Record
};

/// Per-entity options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityOptions {
    /// Default collation; the configured one when `None`.
    pub collation: Option<String>
}

/// A type persisted through a [`Schema`].
pub trait EntitySchema: 'static {
    /// Entity whose schema this one extends.
    type Parent: EntitySchema;

    /// Entity name.
    const NAME: &'static str;

    /// Table name.
    const TABLE: &'static str;

    /// Ends an inheritance chain.
    const IS_ROOT: bool = false;

    /// Carries fields for others without being persisted itself.
    const MIXIN: bool = false;

    /// Schema declared on this entity, without inherited fields.
    fn own_schema() -> Option<&'static Schema> {
        None
    }

    /// Entity options.
    fn options() -> EntityOptions {
        EntityOptions::default()
    }
}

/// Terminates inheritance chains.
#[derive(Debug)]
pub enum NoParent {}

impl EntitySchema for NoParent {
    type Parent = Self;

    const NAME: &'static str = "";
    const TABLE: &'static str = "";
    const IS_ROOT: bool = true;
}

/// Register `E` with `adapter`.
///
/// Emits the entity annotation, every column's annotations, the table-level
/// indexes and uniques, and installs validation hooks when
/// `config.use_hooks_for_validation` is set.
///
/// # Errors
///
/// [`ConfigError::AbstractEntity`] for mixins, and the structural errors of
/// [`check_structure`].
pub fn register<E: EntitySchema>(mut adapter: impl PersistenceAdapter, config: &Config) -> Result<()> {
    if E::MIXIN {
        return Err(ConfigError::AbstractEntity(E::NAME.to_string()).into());
    }

    let schema = collect_schema::<E>();
    check_structure(&schema)?;

    let table = adapter
        .table_name(E::NAME)
        .unwrap_or_else(|| E::TABLE.to_string());
    let collation = E::options()
        .collation
        .unwrap_or_else(|| config.collation.default.clone());
    debug!(entity = E::NAME, table = %table, fields = schema.len(), "registering entity");

    adapter.apply(
        E::NAME,
        Annotation::Entity {
            name:      E::NAME.to_string(),
            table:     table.clone(),
            collation
        }
    );

    for annotation in annotations(E::NAME, &table, &schema, config) {
        if let Some(field) = annotation.field()
            && config.trace.matches(E::NAME, field)
        {
            trace!(entity = E::NAME, field, kind = annotation.name(), ?annotation, "apply");
        }
        adapter.apply(E::NAME, annotation);
    }

    if config.use_hooks_for_validation {
        adapter.install_hooks(E::NAME, hooks(E::NAME, schema, config));
        debug!(entity = E::NAME, "validation hooks installed");
    }
    Ok(())
}

/// Field-level and table-level annotations of `schema` stored in `table`.
#[must_use]
pub fn annotations(entity: &str, table: &str, schema: &Schema, config: &Config) -> Vec<Annotation> {
    let mut out = Vec::new();
    for (field, column) in schema.columns() {
        let ctx = FieldContext {
            entity,
            table,
            field,
            config
        };
        out.extend(column.annotations(&ctx));
    }

    let columns_of = |constraint: &TableConstraint| -> Vec<String> {
        constraint
            .columns
            .iter()
            .flat_map(|field| match schema.get(field) {
                Some(column) => FieldContext {
                    entity,
                    table,
                    field,
                    config
                }
                .constraint_columns(&column.options()),
                None => vec![field.clone()]
            })
            .collect()
    };

    out.extend(schema.indexes().iter().map(|index| Annotation::Index {
        name:    index.name.clone(),
        columns: columns_of(index),
        unique:  false
    }));
    out.extend(schema.uniques().iter().map(|unique| Annotation::Unique {
        name:    unique.name.clone(),
        columns: columns_of(unique)
    }));
    out
}

/// Check that every field a constraint names is a column of `schema`.
///
/// # Errors
///
/// [`ConfigError::UnknownScopeField`] for a column-level unique scoped by a
/// missing sibling, [`ConfigError::UnknownDiscriminatorRelation`] for a
/// discriminator not naming a polymorphic relation, and
/// [`ConfigError::UnknownConstraintColumn`] for a table-level index or unique
/// naming a missing column.
pub fn check_structure(schema: &Schema) -> Result<(), ConfigError> {
    for (field, column) in schema.columns() {
        let options = column.options();
        if let Some(unique) = &options.unique
            && let Some(scope) = unique.scope.iter().find(|scope| !schema.contains(scope))
        {
            return Err(ConfigError::UnknownScopeField {
                field: field.to_string(),
                scope: scope.clone()
            });
        }
        if let Some(relation) = &options.discriminator_for {
            let polymorphic = schema
                .get(relation)
                .and_then(|target| target.options().relation)
                .is_some_and(|target| target.kind == RelationKind::PolymorphicManyToOne);
            if !polymorphic {
                return Err(ConfigError::UnknownDiscriminatorRelation {
                    field:    field.to_string(),
                    relation: relation.clone()
                });
            }
        }
    }

    for constraint in schema.indexes().iter().chain(schema.uniques()) {
        if let Some(column) = constraint.columns.iter().find(|column| !schema.contains(column)) {
            return Err(ConfigError::UnknownConstraintColumn {
                name:   constraint.name.clone(),
                column: column.clone()
            });
        }
    }
    Ok(())
}

fn hooks(entity: &'static str, schema: Schema, config: &Config) -> HookSet {
    let schema = Arc::new(schema);
    let config = Arc::new(config.clone());

    let before_insert = {
        let (schema, config) = (Arc::clone(&schema), Arc::clone(&config));
        record_hook(move |record| {
            let (schema, config) = (Arc::clone(&schema), Arc::clone(&config));
            async move { lifecycle::validate_insert_record(&schema, entity, record, &config).await }.boxed()
        })
    };
    let before_update = {
        let (schema, config) = (Arc::clone(&schema), Arc::clone(&config));
        record_hook(move |record| {
            let (schema, config) = (Arc::clone(&schema), Arc::clone(&config));
            async move { lifecycle::validate_update_record(&schema, entity, record, &config).await }.boxed()
        })
    };

    HookSet {
        before_insert,
        before_update,
        after_load: Arc::new(move |record: &mut Record| lifecycle::apply_defaults_record(&schema, record))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;
    use crate::{adapter::RecordingAdapter, columns, config::TraceFilter};

    struct Timestamps;

    impl EntitySchema for Timestamps {
        type Parent = NoParent;

        const NAME: &'static str = "Timestamps";
        const TABLE: &'static str = "";
        const MIXIN: bool = true;

        fn own_schema() -> Option<&'static Schema> {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            Some(SCHEMA.get_or_init(|| {
                Schema::new()
                    .column("created_at", columns::create_date())
                    .column("updated_at", columns::update_date())
            }))
        }
    }

    struct Account;

    impl EntitySchema for Account {
        type Parent = Timestamps;

        const NAME: &'static str = "Account";
        const TABLE: &'static str = "accounts";

        fn own_schema() -> Option<&'static Schema> {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            Some(SCHEMA.get_or_init(|| {
                Schema::new()
                    .column("id", columns::primary())
                    .column("tenant", columns::string())
                    .column("handle", columns::string().unique_scoped(["tenant"]))
                    .index("IDX_accounts_tenant", ["tenant"])
            }))
        }

        fn options() -> EntityOptions {
            EntityOptions {
                collation: Some("utf8mb4_bin".to_string())
            }
        }
    }

    #[test]
    fn mixins_cannot_be_registered() {
        let err = register::<Timestamps>(RecordingAdapter::new(), &Config::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::AbstractEntity(name)) if name == "Timestamps"
        ));
    }

    #[test]
    fn registers_inherited_fields() {
        let mut orm = RecordingAdapter::new();
        register::<Account>(&mut orm, &Config::new()).unwrap();

        let names: Vec<&str> = orm.annotations_for("Account").map(Annotation::name).collect();
        assert_eq!(
            names,
            vec![
                "Entity",
                "CreateDateColumn",
                "UpdateDateColumn",
                "PrimaryColumn",
                "Column",
                "Column",
                "Index",
                "Index"
            ]
        );

        let Some((_, Annotation::Entity { collation, table, .. })) = orm.annotations().first() else {
            panic!("entity annotation first");
        };
        assert_eq!(collation, "utf8mb4_bin");
        assert_eq!(table, "accounts");
    }

    #[test]
    fn scoped_unique_spans_siblings() {
        let mut orm = RecordingAdapter::new();
        register::<Account>(&mut orm, &Config::new()).unwrap();
        let unique = orm
            .annotations_for("Account")
            .find(|annotation| matches!(annotation, Annotation::Index { unique: true, .. }))
            .cloned();
        assert_eq!(
            unique,
            Some(Annotation::Index {
                name:    "UQ_accounts_handle".to_string(),
                columns: vec!["handle".to_string(), "tenant".to_string()],
                unique:  true
            })
        );
    }

    #[test]
    fn adapter_table_name_wins() {
        let mut orm = RecordingAdapter::new().with_table("Account", "legacy_accounts");
        register::<Account>(&mut orm, &Config::new()).unwrap();
        assert!(matches!(
            orm.annotations().first(),
            Some((_, Annotation::Entity { table, .. })) if table == "legacy_accounts"
        ));
    }

    #[test]
    fn hooks_are_optional() {
        let mut orm = RecordingAdapter::new();
        let config = Config::new()
            .with_hooks_for_validation(false)
            .with_trace(TraceFilter::All);
        register::<Account>(&mut orm, &config).unwrap();
        assert!(orm.hooks("Account").is_none());
    }

    #[test]
    fn structure_errors() {
        let schema = Schema::new().column("handle", columns::string().unique_scoped(["tenant"]));
        assert_eq!(
            check_structure(&schema),
            Err(ConfigError::UnknownScopeField {
                field: "handle".to_string(),
                scope: "tenant".to_string()
            })
        );

        let schema = Schema::new()
            .column("handle", columns::string())
            .unique("UQ_handle_tenant", ["handle", "tenant"]);
        assert_eq!(
            check_structure(&schema),
            Err(ConfigError::UnknownConstraintColumn {
                name:   "UQ_handle_tenant".to_string(),
                column: "tenant".to_string()
            })
        );
    }

    #[test]
    fn discriminator_must_name_polymorphic_relation() {
        let schema = Schema::new()
            .column("subject", columns::polymorphic_many_to_one(["Post", "Comment"]))
            .column("subject_kind", columns::discriminator("subject"));
        assert_eq!(check_structure(&schema), Ok(()));

        let schema = Schema::new()
            .column("author", columns::many_to_one_named("User", "users"))
            .column("author_kind", columns::discriminator("author"));
        assert_eq!(
            check_structure(&schema),
            Err(ConfigError::UnknownDiscriminatorRelation {
                field:    "author_kind".to_string(),
                relation: "author".to_string()
            })
        );
    }

    #[test]
    fn table_constraints_span_polymorphic_columns() {
        let schema = Schema::new()
            .column("subject", columns::polymorphic_many_to_one(["Post", "Comment"]))
            .column("body", columns::string())
            .unique("UQ_comments_subject_body", ["subject", "body"]);
        let annotations = annotations("Comment", "comments", &schema, &Config::new());
        assert_eq!(
            annotations.last(),
            Some(&Annotation::Unique {
                name:    "UQ_comments_subject_body".to_string(),
                columns: vec!["subject_type".to_string(), "subject_id".to_string(), "body".to_string()]
            })
        );
    }

    #[test]
    fn table_constraints_use_column_names() {
        let schema = Schema::new()
            .column("author", columns::many_to_one_named("User", "users"))
            .column("title", columns::string())
            .unique("UQ_posts_author_title", ["author", "title"]);
        let annotations = annotations("Post", "posts", &schema, &Config::new());
        assert_eq!(
            annotations.last(),
            Some(&Annotation::Unique {
                name:    "UQ_posts_author_title".to_string(),
                columns: vec!["author_id".to_string(), "title".to_string()]
            })
        );
    }
}
