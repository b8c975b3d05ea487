// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column kinds.
//!
//! A kind is a zero-sized marker selecting which chain methods a
//! [`Column`](super::Column) exposes. `Column<Text>` has `max()` and
//! `ignore_case()`, `Column<ManyToOne>` has `cascade()`, and so on.
//!
//! | Marker | Constructor(s) | Extra modifiers |
//! |--------|----------------|-----------------|
//! | [`Text`] | `string`, `text` | `min`, `max`, `length`, `email`, `url`, `collate`, `ignore_case` |
//! | [`Integer`] | `int`, `int32`, `bigint` | numeric bounds |
//! | [`Float`] | `number`, `float*`, `decimal` | numeric bounds, `precision`, `scale` |
//! | [`PrimaryKey`] | `primary*` | numeric bounds, `generated` |
//! | [`ForeignKey`] | `foreign_key` | numeric bounds |
//! | [`Discriminator`] | `discriminator` | none |
//! | [`ManyToOne`], [`OneToOne`] | relations | `cascade`, `on_delete`, `on_update`, `foreign_key`, `constraint_name`, `referenced_column` |
//! | [`OneToMany`], [`ManyToMany`] | relations | `eager`, `inverse`; join table on many-to-many |
//! | [`PolymorphicManyToOne`] | `polymorphic_many_to_one` | `cascade`, `on_delete`, `on_update` |

/// Marker selecting a column's modifier set.
pub trait ColumnKind: Send + Sync + 'static {
    /// Kind name recorded in metadata.
    const NAME: &'static str;

    /// Nullable values of this kind read blank strings as `null`.
    const BLANK_AS_NULL: bool = false;
}

/// Kinds carrying numeric bound modifiers.
pub trait Numeric: ColumnKind {}

/// Relation kinds.
pub trait Relational: ColumnKind {}

/// Relation kinds whose owner stores a foreign key column.
pub trait ToOne: Relational {}

macro_rules! kinds {
    ($($(#[$doc:meta])* $name:ident => $label:literal),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub enum $name {}

            impl ColumnKind for $name {
                const NAME: &'static str = $label;
            }
        )*
    };
}

kinds! {
    /// Integer column.
    Integer => "int",
    /// Floating point or decimal column.
    Float => "float",
    /// Boolean column.
    Flag => "boolean",
    /// Enumeration column.
    Enumeration => "enum",
    /// JSON document column.
    Json => "json",
    /// Binary column.
    Binary => "binary",
    /// Date column.
    Date => "date",
    /// ORM-maintained timestamp.
    Timestamp => "timestamp",
    /// Primary key.
    PrimaryKey => "primary",
    /// Scalar shadow of a to-one relation.
    ForeignKey => "foreignKey",
    /// Target type of a polymorphic relation.
    Discriminator => "discriminator",
    /// Many-to-one relation.
    ManyToOne => "manyToOne",
    /// One-to-one relation.
    OneToOne => "oneToOne",
    /// One-to-many relation.
    OneToMany => "oneToMany",
    /// Many-to-many relation.
    ManyToMany => "manyToMany",
    /// Many-to-one relation to one of several entity types.
    PolymorphicManyToOne => "polymorphicManyToOne",
    /// Computed, non-persisted field.
    Derived => "derived",
    /// Caller-supplied validation node.
    Raw => "column",
}

/// String column.
#[derive(Debug, Clone, Copy)]
pub enum Text {}

impl ColumnKind for Text {
    const BLANK_AS_NULL: bool = true;
    const NAME: &'static str = "string";
}

impl Numeric for Integer {}
impl Numeric for Float {}
impl Numeric for PrimaryKey {}
impl Numeric for ForeignKey {}

impl Relational for ManyToOne {}
impl Relational for OneToOne {}
impl Relational for OneToMany {}
impl Relational for ManyToMany {}
impl Relational for PolymorphicManyToOne {}

impl ToOne for ManyToOne {}
impl ToOne for OneToOne {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(Text::NAME, "string");
        assert_eq!(ManyToOne::NAME, "manyToOne");
        assert_eq!(Derived::NAME, "derived");
    }

    #[test]
    fn only_text_reads_blank_as_null() {
        assert!(Text::BLANK_AS_NULL);
        assert!(!Integer::BLANK_AS_NULL);
        assert!(!Json::BLANK_AS_NULL);
    }
}
