// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Persistence annotations handed to the ORM.
//!
//! A column's decorator factory turns its accumulated [`ColumnOptions`] into
//! [`Annotation`]s for one field of one entity. Factories are pure: they run
//! when an entity is registered, never at column construction.
//!
//! ```text
//! ColumnOptions ──► DecoratorFactory(options, FieldContext) ──► Vec<Annotation>
//!                                    │
//!                                    └── naming + typemap from Config
//! ```

use std::sync::Arc;

use super::options::{
    Collation, ColumnOptions, GenerationStrategy, ReferentialAction, RelationKind
};
use crate::config::Config;

/// Where an annotation is being built.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Entity name.
    pub entity: &'a str,
    /// Entity table.
    pub table:  &'a str,
    /// Field name.
    pub field:  &'a str,
    /// Configuration in effect.
    pub config: &'a Config
}

impl FieldContext<'_> {
    /// Database column name holding this field's value.
    ///
    /// To-one relations store their foreign key column; everything else uses
    /// the explicit name or the field name.
    #[must_use]
    pub fn column_name(&self, options: &ColumnOptions) -> String {
        match &options.relation {
            Some(relation) if relation.kind.is_to_one() => relation
                .foreign_key
                .clone()
                .unwrap_or_else(|| self.config.foreign_key_naming.column_name(self.field)),
            _ => options.name.clone().unwrap_or_else(|| self.field.to_string())
        }
    }

    /// Columns an index or unique constraint on this field spans.
    ///
    /// A polymorphic relation spans its `{field}_type` and `{field}_id`
    /// columns; every other field spans its single column.
    #[must_use]
    pub fn constraint_columns(&self, options: &ColumnOptions) -> Vec<String> {
        match &options.relation {
            Some(relation) if relation.kind == RelationKind::PolymorphicManyToOne => {
                vec![format!("{}_type", self.field), format!("{}_id", self.field)]
            }
            _ => vec![self.column_name(options)]
        }
    }
}

/// Fully resolved column definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnSpec {
    /// Column name.
    pub name:        String,
    /// Dialect type name.
    pub column_type: Option<String>,
    /// Allows NULL.
    pub nullable:    bool,
    /// VARCHAR length.
    pub length:      Option<usize>,
    /// Numeric precision.
    pub precision:   Option<u32>,
    /// Numeric scale.
    pub scale:       Option<u32>,
    /// Collation name.
    pub collation:   Option<String>,
    /// Enum values.
    pub enum_values: Option<Vec<String>>,
    /// DEFAULT expression.
    pub default:     Option<String>,
    /// Database generation of a non-primary column.
    pub generated:   Option<GenerationStrategy>,
    /// Value conversion.
    pub transformer: Option<super::options::Transformer>
}

impl ColumnSpec {
    /// Resolve `options` for the field described by `ctx`.
    #[must_use]
    pub fn resolve(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Self {
        Self {
            name:        ctx.column_name(options),
            column_type: options
                .column_type
                .as_ref()
                .map(|ty| ty.resolve(&ctx.config.typemap)),
            nullable:    options.nullable,
            length:      options.length,
            precision:   options.precision,
            scale:       options.scale,
            collation:   options.collation.as_ref().map(|collation| match collation {
                Collation::Named(name) => name.clone(),
                Collation::IgnoreCase => ctx.config.collation.ignore_case.clone()
            }),
            enum_values: options.enum_values.clone(),
            default:     options.db_default.clone(),
            generated:   options.generated,
            transformer: options.transformer.clone()
        }
    }
}

/// One call into the ORM's metadata registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// The entity itself.
    Entity {
        /// Entity name.
        name:      String,
        /// Table name.
        table:     String,
        /// Default collation.
        collation: String
    },

    /// Plain column.
    Column {
        /// Field name.
        field: String,
        /// Column definition.
        spec:  ColumnSpec
    },

    /// Primary key supplied by the caller.
    PrimaryColumn {
        /// Field name.
        field: String,
        /// Column definition.
        spec:  ColumnSpec
    },

    /// Primary key generated by the database.
    PrimaryGeneratedColumn {
        /// Field name.
        field:    String,
        /// Generation strategy.
        strategy: GenerationStrategy,
        /// Column definition.
        spec:     ColumnSpec
    },

    /// Insert timestamp maintained by the ORM.
    CreateDateColumn {
        /// Field name.
        field: String,
        /// Column definition.
        spec:  ColumnSpec
    },

    /// Update timestamp maintained by the ORM.
    UpdateDateColumn {
        /// Field name.
        field: String,
        /// Column definition.
        spec:  ColumnSpec
    },

    /// Index, possibly unique.
    Index {
        /// Index name.
        name:    String,
        /// Indexed columns.
        columns: Vec<String>,
        /// Unique index.
        unique:  bool
    },

    /// Table-level unique constraint.
    Unique {
        /// Constraint name.
        name:    String,
        /// Constrained columns.
        columns: Vec<String>
    },

    /// Relation to another entity.
    Relation {
        /// Field name.
        field:        String,
        /// Cardinality.
        kind:         RelationKind,
        /// Target entity.
        target:       String,
        /// Back-reference on the target.
        inverse_side: Option<String>,
        /// ON DELETE action.
        on_delete:    Option<ReferentialAction>,
        /// ON UPDATE action.
        on_update:    Option<ReferentialAction>,
        /// Load with owner.
        eager:        bool,
        /// Relation may be absent.
        nullable:     bool
    },

    /// Foreign key column of a to-one relation.
    JoinColumn {
        /// Relation field.
        field:             String,
        /// Foreign key column.
        name:              String,
        /// Column on the target.
        referenced_column: String,
        /// Foreign key constraint name.
        constraint_name:   String
    },

    /// Join table of a many-to-many relation.
    JoinTable {
        /// Relation field.
        field:               String,
        /// Join table name.
        name:                String,
        /// Column referencing the owner.
        join_column:         String,
        /// Column referencing the target.
        inverse_join_column: String
    }
}

impl Annotation {
    /// Field the annotation is attached to, `None` for class-level ones.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Column { field, .. }
            | Self::PrimaryColumn { field, .. }
            | Self::PrimaryGeneratedColumn { field, .. }
            | Self::CreateDateColumn { field, .. }
            | Self::UpdateDateColumn { field, .. }
            | Self::Relation { field, .. }
            | Self::JoinColumn { field, .. }
            | Self::JoinTable { field, .. } => Some(field),
            Self::Entity { .. } | Self::Index { .. } | Self::Unique { .. } => None
        }
    }

    /// Short annotation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Entity { .. } => "Entity",
            Self::Column { .. } => "Column",
            Self::PrimaryColumn { .. } => "PrimaryColumn",
            Self::PrimaryGeneratedColumn { .. } => "PrimaryGeneratedColumn",
            Self::CreateDateColumn { .. } => "CreateDateColumn",
            Self::UpdateDateColumn { .. } => "UpdateDateColumn",
            Self::Index { .. } => "Index",
            Self::Unique { .. } => "Unique",
            Self::Relation { .. } => "Relation",
            Self::JoinColumn { .. } => "JoinColumn",
            Self::JoinTable { .. } => "JoinTable"
        }
    }
}

/// Builds a column's field-level annotations.
pub type DecoratorFactory =
    Arc<dyn Fn(&ColumnOptions, &FieldContext<'_>) -> Vec<Annotation> + Send + Sync>;

/// Index and unique annotations declared on a single column.
#[must_use]
pub fn constraint_annotations(options: &ColumnOptions, ctx: &FieldContext<'_>) -> Vec<Annotation> {
    let mut out = Vec::new();
    let spanned = ctx.constraint_columns(options);

    if let Some(index) = &options.index {
        out.push(Annotation::Index {
            name:    index
                .name
                .clone()
                .unwrap_or_else(|| ctx.config.index_naming.name(ctx.table, ctx.field, false)),
            columns: spanned.clone(),
            unique:  false
        });
    }

    if let Some(unique) = &options.unique {
        let mut columns = spanned;
        columns.extend(unique.scope.iter().cloned());
        out.push(Annotation::Index {
            name:   unique
                .name
                .clone()
                .unwrap_or_else(|| ctx.config.index_naming.name(ctx.table, ctx.field, true)),
            columns,
            unique: true
        });
    }

    out
}
