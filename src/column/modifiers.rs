// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Kind-specific modifiers.

use super::{
    Column, JoinTableSpec, ReferentialAction, RelationOptions,
    kind::{Float, ManyToMany, Numeric, OneToOne, PrimaryKey, Relational, Text, ToOne},
    options::{Collation, GenerationStrategy}
};
use crate::registry::FieldType;

impl Column<Text> {
    /// Minimum length.
    #[must_use]
    pub fn min(self, min: usize) -> Self {
        self.chain(|node| node.min_length(min))
    }

    /// Maximum length; sets the VARCHAR length.
    ///
    /// A later call replaces both the bound and the length.
    #[must_use]
    pub fn max(self, max: usize) -> Self {
        self.chain(|node| node.max_length(max))
            .with_options(|options| options.length = Some(max))
    }

    /// Exact length; sets the VARCHAR length.
    #[must_use]
    pub fn length(self, length: usize) -> Self {
        self.chain(|node| node.length(length))
            .with_options(|options| options.length = Some(length))
    }

    /// Email address format.
    #[must_use]
    pub fn email(self) -> Self {
        self.chain(|node| node.email())
    }

    /// URL format.
    #[must_use]
    pub fn url(self) -> Self {
        self.chain(|node| node.url())
    }

    /// Column collation.
    #[must_use]
    pub fn collate(self, collation: impl Into<String>) -> Self {
        let collation = Collation::Named(collation.into());
        self.with_options(|options| options.collation = Some(collation))
    }

    /// The configured case-insensitive collation.
    #[must_use]
    pub fn ignore_case(self) -> Self {
        self.with_options(|options| options.collation = Some(Collation::IgnoreCase))
    }
}

impl<K: Numeric> Column<K> {
    /// Strictly greater than `bound`.
    #[must_use]
    pub fn gt(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.chain(|node| node.gt(bound))
    }

    /// Greater than or equal to `bound`.
    #[must_use]
    pub fn gte(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.chain(|node| node.gte(bound))
    }

    /// Strictly less than `bound`.
    #[must_use]
    pub fn lt(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.chain(|node| node.lt(bound))
    }

    /// Less than or equal to `bound`.
    #[must_use]
    pub fn lte(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.chain(|node| node.lte(bound))
    }

    /// Greater than zero.
    #[must_use]
    pub fn positive(self) -> Self {
        self.chain(|node| node.positive())
    }

    /// Zero or greater.
    #[must_use]
    pub fn nonnegative(self) -> Self {
        self.chain(|node| node.nonnegative())
    }

    /// Multiple of `step`.
    #[must_use]
    pub fn multiple_of(self, step: impl Into<f64>) -> Self {
        let step = step.into();
        self.chain(|node| node.multiple_of(step))
    }
}

impl Column<Float> {
    /// Numeric precision.
    #[must_use]
    pub fn precision(self, precision: u32) -> Self {
        self.with_options(|options| options.precision = Some(precision))
    }

    /// Numeric scale.
    #[must_use]
    pub fn scale(self, scale: u32) -> Self {
        self.with_options(|options| options.scale = Some(scale))
    }
}

impl Column<PrimaryKey> {
    /// Let the database generate the key with `strategy`.
    ///
    /// The field becomes [`FieldType::Generated`]: optional on insert,
    /// omitted on update.
    #[must_use]
    pub fn generated(self, strategy: GenerationStrategy) -> Self {
        self.with_metadata(|metadata| {
            metadata.field_type = FieldType::Generated;
            metadata.options.strategy = Some(strategy);
        })
    }
}

impl<K: Relational> Column<K> {
    fn relation(self, edit: impl FnOnce(&mut RelationOptions)) -> Self {
        self.with_options(|options| {
            if let Some(relation) = options.relation.as_mut() {
                edit(relation);
            }
        })
    }

    /// Delete and update along with the referenced entity.
    #[must_use]
    pub fn cascade(self) -> Self {
        self.on_delete(ReferentialAction::Cascade)
            .on_update(ReferentialAction::Cascade)
    }

    /// ON DELETE action.
    #[must_use]
    pub fn on_delete(self, action: ReferentialAction) -> Self {
        self.relation(|relation| relation.on_delete = Some(action))
    }

    /// ON UPDATE action.
    #[must_use]
    pub fn on_update(self, action: ReferentialAction) -> Self {
        self.relation(|relation| relation.on_update = Some(action))
    }

    /// Load with the owning entity.
    #[must_use]
    pub fn eager(self) -> Self {
        self.relation(|relation| relation.eager = true)
    }

    /// Field on the target pointing back at this entity.
    #[must_use]
    pub fn inverse(self, side: impl Into<String>) -> Self {
        let side = side.into();
        self.relation(|relation| relation.inverse_side = Some(side))
    }
}

impl<K: ToOne> Column<K> {
    /// Foreign key column name.
    #[must_use]
    pub fn foreign_key(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.relation(|relation| relation.foreign_key = Some(column))
    }

    /// Referenced column on the target, `id` by default.
    #[must_use]
    pub fn referenced_column(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.relation(|relation| relation.referenced_column = Some(column))
    }

    /// Foreign key constraint name.
    #[must_use]
    pub fn constraint_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.relation(|relation| relation.constraint_name = Some(name))
    }
}

impl Column<OneToOne> {
    /// Share the primary key: `id` references the target's `id`.
    #[must_use]
    pub fn use_id(self) -> Self {
        self.foreign_key("id").referenced_column("id")
    }
}

impl Column<ManyToMany> {
    fn join(self, edit: impl FnOnce(&mut JoinTableSpec)) -> Self {
        self.relation(|relation| edit(relation.join_table.get_or_insert_with(JoinTableSpec::default)))
    }

    /// Join table name.
    #[must_use]
    pub fn join_table(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.join(|join| join.name = Some(name))
    }

    /// Join table column referencing this entity.
    #[must_use]
    pub fn join_column(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.join(|join| join.join_column = Some(column))
    }

    /// Join table column referencing the target.
    #[must_use]
    pub fn inverse_join_column(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.join(|join| join.inverse_join_column = Some(column))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        columns,
        validate::{ObjectValidator, ParseOptions}
    };

    #[test]
    fn last_max_sets_length() {
        let column = columns::string().max(100).max(200);
        assert_eq!(column.options().length, Some(200));
        let object = ObjectValidator::new().field("title", column.node().clone());
        assert!(object.safe_parse(&json!({"title": "x".repeat(150)}), &ParseOptions::default()).is_ok());
        assert!(object.safe_parse(&json!({"title": "x".repeat(201)}), &ParseOptions::default()).is_err());

        let column = columns::string().max(200).max(100);
        assert_eq!(column.options().length, Some(100));
        let object = ObjectValidator::new().field("title", column.node().clone());
        assert!(object.safe_parse(&json!({"title": "x".repeat(150)}), &ParseOptions::default()).is_err());
    }

    #[test]
    fn cascade_sets_delete_and_update() {
        let options = columns::many_to_one_named("User", "users").cascade().options();
        let relation = options.relation.unwrap();
        assert_eq!(relation.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(relation.on_update, Some(ReferentialAction::Cascade));
    }

    #[test]
    fn length_sets_length() {
        let column = columns::string().length(2);
        assert_eq!(column.options().length, Some(2));
    }

    #[test]
    fn collation_modifiers() {
        assert_eq!(
            columns::string().ignore_case().options().collation,
            Some(Collation::IgnoreCase)
        );
        assert_eq!(
            columns::string().collate("utf8mb4_bin").options().collation,
            Some(Collation::Named("utf8mb4_bin".to_string()))
        );
    }

    #[test]
    fn float_precision_and_scale() {
        let options = columns::decimal().precision(10).scale(2).gte(0).options();
        assert_eq!((options.precision, options.scale), (Some(10), Some(2)));
    }

    #[test]
    fn generated_primary_key() {
        let plain = columns::primary();
        assert_eq!(plain.field_type(), FieldType::Column);

        let generated = columns::primary().generated(GenerationStrategy::Uuid);
        assert_eq!(generated.field_type(), FieldType::Generated);
        assert_eq!(generated.options().strategy, Some(GenerationStrategy::Uuid));
        assert!(generated.options().generated.is_none());
    }

    #[test]
    fn relation_modifiers() {
        let column = columns::many_to_one_named("User", "users")
            .cascade()
            .on_update(ReferentialAction::NoAction)
            .foreign_key("owner")
            .constraint_name("FK_owner")
            .eager();
        let relation = column.options().relation.unwrap();
        assert_eq!(relation.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(relation.on_update, Some(ReferentialAction::NoAction));
        assert_eq!(relation.foreign_key.as_deref(), Some("owner"));
        assert_eq!(relation.constraint_name.as_deref(), Some("FK_owner"));
        assert!(relation.eager);
    }

    #[test]
    fn one_to_one_shares_id() {
        let relation = columns::one_to_one_named("Profile", "profiles")
            .use_id()
            .options()
            .relation
            .unwrap();
        assert_eq!(relation.foreign_key.as_deref(), Some("id"));
        assert_eq!(relation.referenced_column.as_deref(), Some("id"));
    }

    #[test]
    fn join_table_modifiers() {
        let column = columns::many_to_many_named("Tag", "tags")
            .join_table("post_tags")
            .join_column("post")
            .inverse_join_column("tag");
        let join = column.options().relation.unwrap().join_table.unwrap();
        assert_eq!(join.name.as_deref(), Some("post_tags"));
        assert_eq!(join.join_column.as_deref(), Some("post"));
        assert_eq!(join.inverse_join_column.as_deref(), Some("tag"));
    }
}
