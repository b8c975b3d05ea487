// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The seam to an external ORM.
//!
//! [`register`](crate::entity::register) talks to the ORM only through
//! [`PersistenceAdapter`]: it asks for an already-registered table name,
//! hands over [`Annotation`]s one at a time and installs a [`HookSet`].
//!
//! # Hooks
//!
//! | Hook | ORM event | Does |
//! |------|-----------|------|
//! | `before_insert` | before INSERT | two-pass insert validation |
//! | `before_update` | before UPDATE | two-pass update validation |
//! | `after_load` | after SELECT | backfills defaults |
//!
//! Hooks run on the dynamic record form of an entity. A failing
//! `before_*` hook aborts the write.
//!
//! [`RecordingAdapter`] keeps everything in memory; it is what the tests use
//! and a handy way to inspect what an entity would emit.

use std::{collections::HashMap, fmt, sync::Arc};

use futures::future::BoxFuture;

use crate::{column::Annotation, error::Result, validate::Record};

/// Asynchronous hook run before a write.
pub type RecordHook = Arc<dyn for<'a> Fn(&'a mut Record) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// Synchronous hook run after a load.
pub type LoadHook = Arc<dyn Fn(&mut Record) + Send + Sync>;

/// Wrap a closure as a [`RecordHook`].
pub fn record_hook<F>(hook: F) -> RecordHook
where
    F: for<'a> Fn(&'a mut Record) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static
{
    Arc::new(hook)
}

/// Lifecycle callbacks installed for one entity.
#[derive(Clone)]
pub struct HookSet {
    /// Runs before INSERT.
    pub before_insert: RecordHook,
    /// Runs before UPDATE.
    pub before_update: RecordHook,
    /// Runs after a row was loaded.
    pub after_load:    LoadHook
}

impl HookSet {
    /// Run the insert hook on `record`.
    ///
    /// # Errors
    ///
    /// Whatever the hook reports.
    pub async fn before_insert(&self, record: &mut Record) -> Result<()> {
        (self.before_insert)(record).await
    }

    /// Run the update hook on `record`.
    ///
    /// # Errors
    ///
    /// Whatever the hook reports.
    pub async fn before_update(&self, record: &mut Record) -> Result<()> {
        (self.before_update)(record).await
    }

    /// Run the load hook on `record`.
    pub fn after_load(&self, record: &mut Record) {
        (self.after_load)(record);
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet").finish_non_exhaustive()
    }
}

/// External ORM metadata registry.
pub trait PersistenceAdapter {
    /// Table the ORM already knows `entity` by, if any.
    fn table_name(&self, entity: &str) -> Option<String> {
        let _ = entity;
        None
    }

    /// Record one annotation for `entity`.
    fn apply(&mut self, entity: &str, annotation: Annotation);

    /// Install lifecycle hooks for `entity`.
    fn install_hooks(&mut self, entity: &str, hooks: HookSet);
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for &mut A {
    fn table_name(&self, entity: &str) -> Option<String> {
        (**self).table_name(entity)
    }

    fn apply(&mut self, entity: &str, annotation: Annotation) {
        (**self).apply(entity, annotation);
    }

    fn install_hooks(&mut self, entity: &str, hooks: HookSet) {
        (**self).install_hooks(entity, hooks);
    }
}

/// In-memory adapter.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    tables:      HashMap<String, String>,
    annotations: Vec<(String, Annotation)>,
    hooks:       HashMap<String, HookSet>
}

impl RecordingAdapter {
    /// Empty adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the ORM already maps `entity` to `table`.
    #[must_use]
    pub fn with_table(mut self, entity: impl Into<String>, table: impl Into<String>) -> Self {
        self.tables.insert(entity.into(), table.into());
        self
    }

    /// Every annotation in application order.
    #[must_use]
    pub fn annotations(&self) -> &[(String, Annotation)] {
        &self.annotations
    }

    /// Annotations applied to `entity`.
    pub fn annotations_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .iter()
            .filter(move |(name, _)| name == entity)
            .map(|(_, annotation)| annotation)
    }

    /// Annotations applied to `field` of `entity`.
    pub fn field_annotations<'a>(
        &'a self,
        entity: &'a str,
        field: &'a str
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations_for(entity)
            .filter(move |annotation| annotation.field() == Some(field))
    }

    /// Hooks installed for `entity`.
    #[must_use]
    pub fn hooks(&self, entity: &str) -> Option<&HookSet> {
        self.hooks.get(entity)
    }

    /// Run the insert hook of `entity`; a no-op without hooks.
    ///
    /// # Errors
    ///
    /// Whatever the hook reports.
    pub async fn insert(&self, entity: &str, record: &mut Record) -> Result<()> {
        match self.hooks(entity) {
            Some(hooks) => hooks.before_insert(record).await,
            None => Ok(())
        }
    }

    /// Run the update hook of `entity`; a no-op without hooks.
    ///
    /// # Errors
    ///
    /// Whatever the hook reports.
    pub async fn update(&self, entity: &str, record: &mut Record) -> Result<()> {
        match self.hooks(entity) {
            Some(hooks) => hooks.before_update(record).await,
            None => Ok(())
        }
    }

    /// Run the load hook of `entity`; a no-op without hooks.
    pub fn load(&self, entity: &str, record: &mut Record) {
        if let Some(hooks) = self.hooks(entity) {
            hooks.after_load(record);
        }
    }
}

impl PersistenceAdapter for RecordingAdapter {
    fn table_name(&self, entity: &str) -> Option<String> {
        self.tables.get(entity).cloned()
    }

    fn apply(&mut self, entity: &str, annotation: Annotation) {
        self.annotations.push((entity.to_string(), annotation));
    }

    fn install_hooks(&mut self, entity: &str, hooks: HookSet) {
        self.hooks.insert(entity.to_string(), hooks);
    }
}
