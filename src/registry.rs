// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Metadata registry.
//!
//! Every chain call on a validation node produces a new node, so metadata
//! cannot be keyed by the node itself. Instead every node of one logical
//! column is linked to the chain's *root*, and the metadata lives in a block
//! owned by that root.
//!
//! ```text
//! string()          .max(80)          .optional()
//!   #1 ──────────────► #2 ──────────────► #3
//!    │                  │                  │
//!    └──────────────────┴──────────────────┘
//!                       │ RootLink { root: #1 }
//!                       ▼
//!              ┌──────────────────┐
//!              │ Metadata         │
//!              │  field_type      │
//!              │  decorator       │
//!              │  options         │
//!              └──────────────────┘
//! ```
//!
//! Columns carry their [`RootLink`] directly, so resolving a column's
//! metadata never consults the index. The [`Registry`] index exists for bare
//! [`NodeId`]s, for example a node pulled back out of a column with
//! [`ColumnDef::node`](crate::column::ColumnDef::node).
//!
//! Metadata is stored once per root at construction and only merged
//! afterwards.
//!
//! Every chain step of a column adds one index entry and nothing removes it
//! on its own. Columns are meant to be built once, at definition time (the
//! derive caches each entity's schema in a static). Code that builds columns
//! repeatedly at runtime calls [`Registry::prune`] to drop the entries of
//! columns that no longer exist.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, PoisonError, RwLock}
};

use crate::{
    column::{ColumnOptions, DecoratorFactory},
    error::ConfigError,
    schema::Derivation,
    validate::NodeId
};

/// Classification driving the insert/update projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Value supplied by the storage engine.
    Generated,

    /// Ordinary caller-supplied column.
    #[default]
    Column,

    /// Association to another entity.
    Relation
}

/// Persistence metadata of one column root.
#[derive(Clone, Default)]
pub struct Metadata {
    /// Projection classification.
    pub field_type:        FieldType,
    /// Constructor kind, e.g. `"string"`.
    pub kind:              &'static str,
    /// Builds the field's annotations; `None` for non-persisted fields.
    pub decorator_factory: Option<DecoratorFactory>,
    /// Accumulated persistence options.
    pub options:           ColumnOptions,
    /// Computed-field function of a derived column.
    pub derive:            Option<Derivation>
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("field_type", &self.field_type)
            .field("kind", &self.kind)
            .field("decorator_factory", &self.decorator_factory.is_some())
            .field("options", &self.options)
            .field("derive", &self.derive.is_some())
            .finish()
    }
}

/// Shallow update of [`Metadata`]: every `Some` replaces the stored entry.
#[derive(Clone, Default)]
pub struct MetadataPatch {
    /// New classification.
    pub field_type:        Option<FieldType>,
    /// New kind.
    pub kind:              Option<&'static str>,
    /// New decorator factory.
    pub decorator_factory: Option<DecoratorFactory>,
    /// New options record.
    pub options:           Option<ColumnOptions>,
    /// New derivation.
    pub derive:            Option<Derivation>
}

impl MetadataPatch {
    fn apply(self, metadata: &mut Metadata) {
        if let Some(field_type) = self.field_type {
            metadata.field_type = field_type;
        }
        if let Some(kind) = self.kind {
            metadata.kind = kind;
        }
        if let Some(factory) = self.decorator_factory {
            metadata.decorator_factory = Some(factory);
        }
        if let Some(options) = self.options {
            metadata.options = options;
        }
        if let Some(derive) = self.derive {
            metadata.derive = Some(derive);
        }
    }
}

impl From<Metadata> for MetadataPatch {
    fn from(metadata: Metadata) -> Self {
        Self {
            field_type:        Some(metadata.field_type),
            kind:              Some(metadata.kind),
            decorator_factory: metadata.decorator_factory,
            options:           Some(metadata.options),
            derive:            metadata.derive
        }
    }
}

type Block = Arc<RwLock<Option<Metadata>>>;

/// Owning reference from a node to its root's metadata block.
///
/// Clones share the block.
#[derive(Clone)]
pub struct RootLink {
    root:  NodeId,
    block: Block
}

impl RootLink {
    fn fresh(root: NodeId) -> Self {
        Self {
            root,
            block: Arc::new(RwLock::new(None))
        }
    }

    /// Root node of the chain.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Snapshot of the stored metadata.
    #[must_use]
    pub fn metadata(&self) -> Option<Metadata> {
        self.block.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Read the stored metadata without cloning it.
    pub fn with<R>(&self, read: impl FnOnce(Option<&Metadata>) -> R) -> R {
        read(self.block.read().unwrap_or_else(PoisonError::into_inner).as_ref())
    }

    /// Merge `patch` into the block, creating it on first store.
    pub fn store(&self, patch: impl Into<MetadataPatch>) {
        let mut guard = self.block.write().unwrap_or_else(PoisonError::into_inner);
        patch.into().apply(guard.get_or_insert_with(Metadata::default));
    }

    /// Edit the stored metadata, starting from defaults when empty.
    pub(crate) fn update(&self, edit: impl FnOnce(&mut Metadata)) {
        let mut guard = self.block.write().unwrap_or_else(PoisonError::into_inner);
        edit(guard.get_or_insert_with(Metadata::default));
    }

    /// Edit the stored metadata.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoMetadata`] when nothing was stored for the root.
    pub fn modify(&self, edit: impl FnOnce(&mut Metadata)) -> Result<(), ConfigError> {
        let mut guard = self.block.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(metadata) => {
                edit(metadata);
                Ok(())
            }
            None => Err(ConfigError::NoMetadata(self.root))
        }
    }

    /// Whether both links share one block.
    #[must_use]
    pub fn same_block(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.block, &other.block)
    }
}

impl fmt::Debug for RootLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootLink")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Identity index from validation nodes to their root links.
///
/// Entries are added per chain step and kept until [`Registry::prune`].
#[derive(Default)]
pub struct Registry {
    links: RwLock<HashMap<NodeId, RootLink>>
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

impl Registry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by the column constructors.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Link `node` to `root`, replacing any earlier link of `node`.
    ///
    /// The returned link shares the root's block; an unlinked root gets a
    /// fresh, empty block and is linked to itself.
    pub fn link_root(&self, node: NodeId, root: NodeId) -> RootLink {
        let mut links = self.links.write().unwrap_or_else(PoisonError::into_inner);
        let link = match links.get(&root) {
            Some(existing) => existing.clone(),
            None => {
                let link = RootLink::fresh(root);
                links.insert(root, link.clone());
                link
            }
        };
        links.insert(node, link.clone());
        link
    }

    /// Link `node` to an existing root link.
    pub(crate) fn attach(&self, node: NodeId, link: &RootLink) {
        self.links
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(node, link.clone());
    }

    /// Root link of `node`, if any.
    #[must_use]
    pub fn root_link(&self, node: NodeId) -> Option<RootLink> {
        self.links
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&node)
            .cloned()
    }

    /// Whether `node` is linked to a root.
    #[must_use]
    pub fn is_linked(&self, node: NodeId) -> bool {
        self.links
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&node)
    }

    /// Merge `patch` into the metadata of `node`'s root.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotAColumnType`] when `node` has no root link.
    pub fn store_metadata(&self, node: NodeId, patch: impl Into<MetadataPatch>) -> Result<(), ConfigError> {
        let link = self.root_link(node).ok_or(ConfigError::NotAColumnType(node))?;
        link.store(patch);
        Ok(())
    }

    /// Metadata of `node`'s root.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoMetadata`] when `node` is unlinked or nothing was
    /// stored for its root.
    pub fn get_metadata(&self, node: NodeId) -> Result<Metadata, ConfigError> {
        self.try_get_metadata(node).ok_or(ConfigError::NoMetadata(node))
    }

    /// Metadata of `node`'s root, if any.
    #[must_use]
    pub fn try_get_metadata(&self, node: NodeId) -> Option<Metadata> {
        self.root_link(node)?.metadata()
    }

    /// Edit the metadata of `node`'s root.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoMetadata`] when there is nothing to edit.
    pub fn modify_metadata(&self, node: NodeId, edit: impl FnOnce(&mut Metadata)) -> Result<(), ConfigError> {
        self.root_link(node)
            .ok_or(ConfigError::NoMetadata(node))?
            .modify(edit)
    }

    /// Edit the options of `node`'s root.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoMetadata`] when there is nothing to edit.
    pub fn modify_column_options(
        &self,
        node: NodeId,
        edit: impl FnOnce(&mut ColumnOptions)
    ) -> Result<(), ConfigError> {
        self.modify_metadata(node, |metadata| edit(&mut metadata.options))
    }

    /// Drop the links of roots whose metadata block is held by nothing but
    /// this index, and return how many were dropped.
    ///
    /// Bare nodes of a pruned root no longer resolve; columns still alive
    /// keep every link.
    pub fn prune(&self) -> usize {
        let mut links = self.links.write().unwrap_or_else(PoisonError::into_inner);
        let mut held: HashMap<NodeId, usize> = HashMap::new();
        for link in links.values() {
            *held.entry(link.root).or_default() += 1;
        }
        let before = links.len();
        links.retain(|_, link| Arc::strong_count(&link.block) > held[&link.root]);
        before - links.len()
    }

    /// Number of linked nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no node is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("links", &self.len()).finish()
    }
}
