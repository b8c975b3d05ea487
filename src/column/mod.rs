// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Persistence-aware columns.
//!
//! A [`Column`] pairs a validation [`Type`] with the [`RootLink`] of the
//! chain it belongs to. Every chain method goes through one step:
//!
//! 1. apply the node transformation,
//! 2. if the result is a new node, link it to the same root,
//! 3. return a column holding the new node and the same root link.
//!
//! A transformation that hands back the receiver (a no-op such as
//! `optional()` on an optional node) is not re-linked. Persistence options
//! always go to the shared root block, so every node of one chain reports the
//! same options. Use [`Column::fork`] to branch a column into an independent
//! root.
//!
//! # Example
//!
//! ```rust
//! use entity_schema::{columns, registry::FieldType};
//!
//! let email = columns::string().max(120).unique().optional();
//! assert_eq!(email.field_type(), FieldType::Column);
//! assert_eq!(email.options().length, Some(120));
//! assert!(email.options().nullable);
//! assert!(email.options().unique.is_some());
//! ```

mod annotation;
pub mod kind;
mod modifiers;
mod options;

use std::{fmt, marker::PhantomData};

pub use annotation::{Annotation, ColumnSpec, DecoratorFactory, FieldContext, constraint_annotations};
pub use kind::ColumnKind;
pub use options::{
    BooleanTransformer, Collation, ColumnOptions, GenerationStrategy, IndexSpec, JoinTableSpec,
    ReferentialAction, RelationKind, RelationOptions, Transformer, UniqueSpec, ValueTransformer
};
use serde_json::Value;

use crate::{
    config::ColumnType,
    error::ConfigError,
    registry::{FieldType, Metadata, Registry, RootLink},
    schema::Derivation,
    validate::{NodeId, Type}
};

/// Type-erased column: a validation node and its root link.
#[derive(Clone)]
pub struct ColumnDef {
    node: Type,
    link: RootLink
}

impl ColumnDef {
    /// Register `node` as the root of a new column carrying `metadata`.
    pub(crate) fn register(node: Type, metadata: Metadata) -> Self {
        let link = Registry::global().link_root(node.id(), node.id());
        link.store(metadata);
        Self { node, link }
    }

    /// Column of a bare node previously produced by a column chain.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotAColumnType`] when the node never passed through a
    /// column constructor.
    pub fn from_node(node: &Type) -> Result<Self, ConfigError> {
        let link = Registry::global()
            .root_link(node.id())
            .ok_or(ConfigError::NotAColumnType(node.id()))?;
        Ok(Self {
            node: node.clone(),
            link
        })
    }

    fn chain(&self, step: impl FnOnce(&Type) -> Type) -> Self {
        let next = step(&self.node);
        if next.id() == self.node.id() {
            return self.clone();
        }
        Registry::global().attach(next.id(), &self.link);
        Self {
            node: next,
            link: self.link.clone()
        }
    }

    fn fork(&self) -> Self {
        Self::register(self.node.fresh(), self.metadata())
    }

    pub(crate) fn update(&self, edit: impl FnOnce(&mut Metadata)) {
        self.link.update(edit);
    }

    /// Current validation node.
    #[must_use]
    pub const fn node(&self) -> &Type {
        &self.node
    }

    /// Root node of the chain.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.link.root()
    }

    /// Root link shared by every node of the chain.
    #[must_use]
    pub const fn link(&self) -> &RootLink {
        &self.link
    }

    /// Metadata snapshot.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        self.link.metadata().unwrap_or_default()
    }

    /// Projection classification.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.link.with(|m| m.map(|m| m.field_type).unwrap_or_default())
    }

    /// Constructor kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.link.with(|m| m.map_or("", |m| m.kind))
    }

    /// Persistence options snapshot.
    #[must_use]
    pub fn options(&self) -> ColumnOptions {
        self.link.with(|m| m.map(|m| m.options.clone()).unwrap_or_default())
    }

    /// Computed-field function, for derived columns.
    #[must_use]
    pub fn derivation(&self) -> Option<Derivation> {
        self.link.with(|m| m.and_then(|m| m.derive.clone()))
    }

    /// Whether the node is read-only.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.node.is_readonly()
    }

    /// Whether the node accepts a missing value.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.node.is_optional()
    }

    /// Whether the node accepts `null`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.node.is_nullable()
    }

    /// Value substituted for a missing input.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.node.default_value()
    }

    /// Field-level annotations for the field described by `ctx`.
    ///
    /// Columns without a decorator factory produce nothing.
    #[must_use]
    pub fn annotations(&self, ctx: &FieldContext<'_>) -> Vec<Annotation> {
        let metadata = self.metadata();
        let Some(factory) = metadata.decorator_factory else {
            return Vec::new();
        };
        let mut out = factory(&metadata.options, ctx);
        out.extend(constraint_annotations(&metadata.options, ctx));
        out
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("node", &self.node.id())
            .field("root", &self.root())
            .field("kind", &self.kind())
            .field("field_type", &self.field_type())
            .finish()
    }
}

/// Typed column builder.
///
/// `K` selects the kind-specific modifiers; see [`kind`].
pub struct Column<K: ColumnKind> {
    def:  ColumnDef,
    kind: PhantomData<fn() -> K>
}

impl<K: ColumnKind> Clone for Column<K> {
    fn clone(&self) -> Self {
        Self::from_def(self.def.clone())
    }
}

impl<K: ColumnKind> fmt::Debug for Column<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.def, f)
    }
}

impl<K: ColumnKind> From<Column<K>> for ColumnDef {
    fn from(column: Column<K>) -> Self {
        column.def
    }
}

impl<K: ColumnKind> Column<K> {
    /// Register a new column root.
    pub(crate) fn build(node: Type, mut metadata: Metadata) -> Self {
        metadata.kind = K::NAME;
        Self::from_def(ColumnDef::register(node, metadata))
    }

    const fn from_def(def: ColumnDef) -> Self {
        Self {
            def,
            kind: PhantomData
        }
    }

    pub(crate) fn chain(self, step: impl FnOnce(&Type) -> Type) -> Self {
        Self::from_def(self.def.chain(step))
    }

    pub(crate) fn with_metadata(self, edit: impl FnOnce(&mut Metadata)) -> Self {
        self.def.update(edit);
        self
    }

    pub(crate) fn with_options(self, edit: impl FnOnce(&mut ColumnOptions)) -> Self {
        self.with_metadata(|metadata| edit(&mut metadata.options))
    }

    /// Type-erased view.
    #[must_use]
    pub const fn def(&self) -> &ColumnDef {
        &self.def
    }

    /// Current validation node.
    #[must_use]
    pub const fn node(&self) -> &Type {
        self.def.node()
    }

    /// Root node of the chain.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.def.root()
    }

    /// Metadata snapshot.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        self.def.metadata()
    }

    /// Projection classification.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.def.field_type()
    }

    /// Persistence options snapshot.
    #[must_use]
    pub fn options(&self) -> ColumnOptions {
        self.def.options()
    }

    /// Copy of this column under a new, independent root.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self::from_def(self.def.fork())
    }

    /// Accept a missing value; the column becomes nullable.
    #[must_use]
    pub fn optional(self) -> Self {
        self.chain(|node| node.allow_empty().optional())
            .with_options(|options| options.nullable = true)
    }

    /// Accept `null`; the column becomes nullable.
    ///
    /// Text columns additionally read blank strings as `null`.
    #[must_use]
    pub fn nullable(self) -> Self {
        self.chain(|node| {
            let node = node.allow_empty();
            let node = if K::BLANK_AS_NULL {
                node.blank_as_null()
            } else {
                node
            };
            node.nullable()
        })
        .with_options(|options| options.nullable = true)
    }

    /// Substitute `value` for a missing input.
    #[must_use]
    pub fn default(self, value: impl Into<Value>) -> Self {
        self.chain(|node| node.default(value))
    }

    /// Substitute a freshly computed value for a missing input.
    #[must_use]
    pub fn default_with<F>(self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static
    {
        self.chain(|node| node.default_with(factory))
    }

    /// Exclude the field from both projections.
    #[must_use]
    pub fn readonly(self) -> Self {
        self.chain(Type::readonly)
    }

    /// Custom synchronous check.
    #[must_use]
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static
    {
        self.chain(|node| node.refine(predicate, message))
    }

    /// Custom asynchronous check.
    #[must_use]
    pub fn refine_async<F, Fut>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = bool> + Send + 'static
    {
        self.chain(|node| node.refine_async(predicate, message))
    }

    /// Apply an arbitrary node transformation.
    #[must_use]
    pub fn map_node(self, step: impl FnOnce(&Type) -> Type) -> Self {
        self.chain(step)
    }

    /// Index the column under a generated name.
    #[must_use]
    pub fn index(self) -> Self {
        self.with_options(|options| options.index = Some(IndexSpec::default()))
    }

    /// Index the column under `name`.
    #[must_use]
    pub fn index_named(self, name: impl Into<String>) -> Self {
        let spec = IndexSpec::named(name);
        self.with_options(|options| options.index = Some(spec))
    }

    /// Unique constraint under a generated name.
    #[must_use]
    pub fn unique(self) -> Self {
        self.with_options(|options| options.unique = Some(UniqueSpec::default()))
    }

    /// Unique constraint under `name`.
    #[must_use]
    pub fn unique_named(self, name: impl Into<String>) -> Self {
        let spec = UniqueSpec::named(name);
        self.with_options(|options| options.unique = Some(spec))
    }

    /// Unique across this column and the sibling fields in `scope`.
    #[must_use]
    pub fn unique_scoped<I, S>(self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let spec = UniqueSpec::scoped(scope);
        self.with_options(|options| options.unique = Some(spec))
    }

    /// Unique constraint from a full spec.
    #[must_use]
    pub fn unique_with(self, spec: UniqueSpec) -> Self {
        self.with_options(|options| options.unique = Some(spec))
    }

    /// Database DEFAULT expression.
    #[must_use]
    pub fn db_default(self, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        self.with_options(|options| options.db_default = Some(expression))
    }

    /// Value supplied by the database; the field leaves both projections.
    #[must_use]
    pub fn db_generated(self, strategy: GenerationStrategy) -> Self {
        self.with_options(|options| options.generated = Some(strategy))
    }

    /// Convert values between entity and database form.
    #[must_use]
    pub fn transformer(self, transformer: impl ValueTransformer + 'static) -> Self {
        let transformer = Transformer::new(transformer);
        self.with_options(|options| options.transformer = Some(transformer))
    }

    /// Override the column type.
    #[must_use]
    pub fn column_type(self, column_type: impl Into<ColumnType>) -> Self {
        let column_type = column_type.into();
        self.with_options(|options| options.column_type = Some(column_type))
    }

    /// Override the column name.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.with_options(|options| options.name = Some(name))
    }

    /// Set a free-form adapter option.
    #[must_use]
    pub fn extra(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let (key, value) = (key.into(), value.into());
        self.with_options(|options| {
            options.extra.insert(key, value);
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        columns,
        config::{Config, LogicalType},
        validate::{ObjectValidator, ParseOptions}
    };

    fn parse(column: &ColumnDef, value: serde_json::Value) -> Result<serde_json::Value, usize> {
        let object = ObjectValidator::new().field("v", column.node().clone());
        object
            .safe_parse(&json!({ "v": value }), &ParseOptions::default())
            .map(|record| record.get("v").cloned().unwrap_or(serde_json::Value::Null))
            .map_err(|issues| issues.len())
    }

    #[test]
    fn chain_links_new_nodes_to_root() {
        let base = columns::string();
        let root = base.root();
        let next = base.clone().max(10).optional();
        assert_ne!(next.node().id(), base.node().id());
        assert_eq!(next.root(), root);
        let link = Registry::global().root_link(next.node().id()).unwrap();
        assert_eq!(link.root(), root);
    }

    #[test]
    fn noop_chain_keeps_node() {
        let column = columns::int().optional();
        let id = column.node().id();
        let again = column.optional();
        assert_eq!(again.node().id(), id);
    }

    #[test]
    fn classification_survives_chaining() {
        let primary = columns::primary()
            .generated(GenerationStrategy::Increment)
            .optional()
            .nullable()
            .default(1);
        assert_eq!(primary.field_type(), FieldType::Generated);

        let relation = columns::many_to_one_named("User", "users").optional().nullable();
        assert_eq!(relation.field_type(), FieldType::Relation);
    }

    #[test]
    fn unique_does_not_touch_nullable() {
        let before = columns::string().max(40);
        let expected = ColumnOptions {
            unique: Some(UniqueSpec::default()),
            ..before.options()
        };
        let after = before.unique();
        assert_eq!(after.options(), expected);
        assert!(!after.options().nullable);
    }

    #[test]
    fn default_then_nullable_round_trip() {
        let column = columns::string().default("x").nullable();
        assert!(column.options().nullable);
        assert_eq!(column.def().default_value(), Some(json!("x")));

        let object = ObjectValidator::new().field("v", column.node().clone());
        let record = object.safe_parse(&json!({}), &ParseOptions::default()).unwrap();
        assert_eq!(record.get("v"), Some(&json!("x")));
    }

    #[test]
    fn optional_string_accepts_empty() {
        let required = ColumnDef::from(columns::string());
        assert_eq!(parse(&required, json!("")), Err(1));

        let optional = ColumnDef::from(columns::string().optional());
        assert_eq!(parse(&optional, json!("")), Ok(json!("")));
    }

    #[test]
    fn nullable_string_reads_blank_as_null() {
        let column = ColumnDef::from(columns::string().nullable());
        assert_eq!(parse(&column, json!("   ")), Ok(serde_json::Value::Null));
        assert_eq!(parse(&column, json!(" a ")), Ok(json!("a")));
    }

    #[test]
    fn options_are_shared_across_the_chain() {
        let base = columns::string();
        let longer = base.clone().max(50);
        let _ = base.clone().index();
        assert!(longer.options().index.is_some());
        assert_eq!(base.options().length, Some(50));
    }

    #[test]
    fn fork_detaches_root() {
        let base = columns::string().max(50);
        let forked = base.fork().unique();
        assert_ne!(forked.root(), base.root());
        assert!(base.options().unique.is_none());
        assert_eq!(forked.options().length, Some(50));
    }

    #[test]
    fn from_node_resolves_chain_nodes() {
        let column = columns::int().positive().optional();
        let def = ColumnDef::from_node(column.node()).unwrap();
        assert_eq!(def.root(), column.root());
        assert_eq!(def.kind(), "int");

        let bare = Type::int();
        assert_eq!(
            ColumnDef::from_node(&bare).map(|def| def.root()),
            Err(ConfigError::NotAColumnType(bare.id()))
        );
    }

    #[test]
    fn option_modifiers() {
        let column = columns::string()
            .named("display_name")
            .column_type("citext")
            .db_default("''")
            .index_named("by_name")
            .unique_scoped(["tenant_id"])
            .extra("comment", "shown in UI");
        let options = column.options();
        assert_eq!(options.name.as_deref(), Some("display_name"));
        assert_eq!(options.column_type, Some(ColumnType::Named("citext".to_string())));
        assert_eq!(options.db_default.as_deref(), Some("''"));
        assert_eq!(options.index, Some(IndexSpec::named("by_name")));
        assert_eq!(options.unique.map(|u| u.scope), Some(vec!["tenant_id".to_string()]));
        assert_eq!(options.extra.get("comment"), Some(&json!("shown in UI")));
    }

    #[test]
    fn annotations_include_constraints() {
        let config = Config::new();
        let column = ColumnDef::from(columns::string().index());
        let ctx = FieldContext {
            entity: "User",
            table:  "users",
            field:  "email",
            config: &config
        };
        let annotations = column.annotations(&ctx);
        assert_eq!(annotations.len(), 2);
        assert!(matches!(&annotations[0], Annotation::Column { field, .. } if field == "email"));
        assert!(matches!(&annotations[1], Annotation::Index { unique: false, .. }));
    }

    #[test]
    fn derived_columns_are_persisted() {
        let config = Config::new();
        let column = ColumnDef::from(columns::derived(|_| Ok(json!(1))));
        let ctx = FieldContext {
            entity: "User",
            table:  "users",
            field:  "score",
            config: &config
        };
        assert!(matches!(&column.annotations(&ctx)[..], [Annotation::Column { .. }]));
        assert!(column.derivation().is_some());
    }

    #[test]
    fn typed_options_recorded() {
        let column = columns::string();
        assert_eq!(
            column.options().column_type,
            Some(ColumnType::Logical(LogicalType::String))
        );
    }
}
