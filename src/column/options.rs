// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Persistence options accumulated on a column root.
//!
//! Options are recorded once at construction and merged by modifier calls.
//! Each modifier touches only its own key: `unique()` never changes
//! `nullable` and `max(n)` only sets `length`.
//!
//! # Option Keys
//!
//! | Key | Set by | Persistence meaning |
//! |-----|--------|---------------------|
//! | `column_type` | constructors, `column_type()` | SQL type |
//! | `name` | `named()` | column name override |
//! | `nullable` | `optional()`, `nullable()` | allows NULL |
//! | `length` | `max()`, `length()` | VARCHAR length |
//! | `precision`, `scale` | `precision()`, `scale()` | DECIMAL/FLOAT size |
//! | `collation` | `collate()`, `ignore_case()` | column collation |
//! | `index`, `unique` | `index()`, `unique()` | index declarations |
//! | `generated` | `db_generated()` | value supplied by the database |
//! | `db_default` | `db_default()` | DEFAULT expression |
//! | `transformer` | `transformer()`, `boolean()` | value conversion |
//! | `relation` | relation constructors | relation annotation data |
//! | `foreign_key_for` | `foreign_key()` | scalar shadow of a to-one relation |
//! | `discriminator_for` | `discriminator()` | target type of a polymorphic relation |

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

use crate::config::ColumnType;

/// Referential action for foreign key ON DELETE/ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    /// Delete/update child rows along with the parent.
    Cascade,

    /// Set the foreign key to NULL.
    SetNull,

    /// Set the foreign key to its default.
    SetDefault,

    /// Refuse while children exist (deferred check).
    Restrict,

    /// Refuse while children exist (immediate check).
    NoAction
}

impl ReferentialAction {
    /// Parse from a SQL-ish spelling such as `"set null"` or `"CASCADE"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '_'], "").as_str() {
            "cascade" => Some(Self::Cascade),
            "setnull" => Some(Self::SetNull),
            "setdefault" => Some(Self::SetDefault),
            "restrict" => Some(Self::Restrict),
            "noaction" => Some(Self::NoAction),
            _ => None
        }
    }

    /// SQL spelling.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION"
        }
    }
}

/// Value generation strategy for primary keys and generated columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Auto-increment integer.
    Increment,

    /// Database-generated UUID.
    Uuid,

    /// CockroachDB-style row id.
    Rowid,

    /// SQL identity column.
    Identity
}

impl GenerationStrategy {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Uuid => "uuid",
            Self::Rowid => "rowid",
            Self::Identity => "identity"
        }
    }
}

/// Collation choice recorded on a string column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collation {
    /// A literal collation name.
    Named(String),

    /// The configured case-insensitive collation.
    IgnoreCase
}

/// Column-level index declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSpec {
    /// Explicit name; generated from the naming strategy otherwise.
    pub name: Option<String>
}

impl IndexSpec {
    /// Index with an explicit name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into())
        }
    }
}

/// Column-level unique declaration.
///
/// A non-empty `scope` makes the constraint composite over this column and
/// the named sibling fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueSpec {
    /// Explicit name; generated from the naming strategy otherwise.
    pub name:  Option<String>,
    /// Sibling fields completing the key.
    pub scope: Vec<String>
}

impl UniqueSpec {
    /// Unique constraint with an explicit name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name:  Some(name.into()),
            scope: Vec::new()
        }
    }

    /// Unique across this column and `scope`.
    #[must_use]
    pub fn scoped<I, S>(scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            name:  None,
            scope: scope.into_iter().map(Into::into).collect()
        }
    }
}

/// Join table of a many-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinTableSpec {
    /// Table name.
    pub name:                Option<String>,
    /// Column referencing the owning side.
    pub join_column:         Option<String>,
    /// Column referencing the target side.
    pub inverse_join_column: Option<String>
}

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Many owners share one target; the owner holds the foreign key.
    ManyToOne,

    /// One owner, one target; the owning side holds the foreign key.
    OneToOne,

    /// Inverse side of a many-to-one.
    OneToMany,

    /// Linked through a join table.
    ManyToMany,

    /// Many owners share one target of several entity types; the owner
    /// stores the target's type and id.
    PolymorphicManyToOne
}

impl RelationKind {
    /// Whether the owning side stores a foreign key column.
    #[must_use]
    pub const fn is_to_one(&self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOne)
    }
}

/// Relation data recorded by relation constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationOptions {
    /// Cardinality.
    pub kind:              RelationKind,
    /// Target entity name.
    pub target:            &'static str,
    /// Target table name.
    pub target_table:      &'static str,
    /// Field on the target pointing back, if any.
    pub inverse_side:      Option<String>,
    /// ON DELETE action.
    pub on_delete:         Option<ReferentialAction>,
    /// ON UPDATE action.
    pub on_update:         Option<ReferentialAction>,
    /// Foreign key column name override.
    pub foreign_key:       Option<String>,
    /// Referenced column on the target, `id` by default.
    pub referenced_column: Option<String>,
    /// Constraint name override.
    pub constraint_name:   Option<String>,
    /// Load the relation with its owner.
    pub eager:             bool,
    /// Join table of a many-to-many relation.
    pub join_table:        Option<JoinTableSpec>,
    /// Candidate targets of a polymorphic relation.
    pub targets:           Vec<&'static str>
}

impl RelationOptions {
    /// Relation of `kind` to `target` stored in `target_table`.
    #[must_use]
    pub const fn new(kind: RelationKind, target: &'static str, target_table: &'static str) -> Self {
        Self {
            kind,
            target,
            target_table,
            inverse_side:      None,
            on_delete:         None,
            on_update:         None,
            foreign_key:       None,
            referenced_column: None,
            constraint_name:   None,
            eager:             false,
            join_table:        None,
            targets:           Vec::new()
        }
    }
}

/// Converts values between entity form and database form.
pub trait ValueTransformer: Send + Sync {
    /// Entity value to database value.
    fn to_db(&self, value: Value) -> Value;

    /// Database value to entity value.
    fn from_db(&self, raw: Value) -> Value;
}

/// Shared handle to a [`ValueTransformer`].
///
/// Two handles are equal when they point at the same transformer.
#[derive(Clone)]
pub struct Transformer(Arc<dyn ValueTransformer>);

impl Transformer {
    /// Wrap a transformer.
    pub fn new(transformer: impl ValueTransformer + 'static) -> Self {
        Self(Arc::new(transformer))
    }

    /// Entity value to database value.
    #[must_use]
    pub fn to_db(&self, value: Value) -> Value {
        self.0.to_db(value)
    }

    /// Database value to entity value.
    #[must_use]
    pub fn from_db(&self, raw: Value) -> Value {
        self.0.from_db(raw)
    }
}

impl PartialEq for Transformer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transformer(..)")
    }
}

/// Reads loosely typed database flags as booleans.
///
/// `0`, `"0"`, `"false"`, `""` and `false` read as `false`; `null` stays
/// `null`; everything else reads as `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTransformer;

impl ValueTransformer for BooleanTransformer {
    fn to_db(&self, value: Value) -> Value {
        value
    }

    fn from_db(&self, raw: Value) -> Value {
        match raw {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Number(n) => Value::Bool(n.as_f64().is_some_and(|n| n != 0.0)),
            Value::String(s) => Value::Bool(!matches!(s.as_str(), "" | "0" | "false")),
            _ => Value::Bool(true)
        }
    }
}

/// Persistence options of one column root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnOptions {
    /// SQL type.
    pub column_type:       Option<ColumnType>,
    /// Column name override.
    pub name:              Option<String>,
    /// Allows NULL.
    pub nullable:          bool,
    /// VARCHAR length.
    pub length:            Option<usize>,
    /// Numeric precision.
    pub precision:         Option<u32>,
    /// Numeric scale.
    pub scale:             Option<u32>,
    /// Collation.
    pub collation:         Option<Collation>,
    /// Allowed values of an enum column.
    pub enum_values:       Option<Vec<String>>,
    /// Column index.
    pub index:             Option<IndexSpec>,
    /// Column unique constraint.
    pub unique:            Option<UniqueSpec>,
    /// Primary key column.
    pub primary:           bool,
    /// Generation strategy of a generated primary key.
    pub strategy:          Option<GenerationStrategy>,
    /// Value supplied by the database for a non-primary column.
    pub generated:         Option<GenerationStrategy>,
    /// DEFAULT expression.
    pub db_default:        Option<String>,
    /// Value conversion.
    pub transformer:       Option<Transformer>,
    /// Relation this column is the foreign key of.
    pub foreign_key_for:   Option<String>,
    /// Polymorphic relation this column names the target type of.
    pub discriminator_for: Option<String>,
    /// Relation data.
    pub relation:          Option<RelationOptions>,
    /// Free-form adapter-specific options.
    pub extra:             BTreeMap<String, Value>
}

impl ColumnOptions {
    /// Options with only a column type.
    #[must_use]
    pub fn typed(column_type: impl Into<ColumnType>) -> Self {
        Self {
            column_type: Some(column_type.into()),
            ..Self::default()
        }
    }
}
