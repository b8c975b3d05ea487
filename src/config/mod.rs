// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Library configuration.
//!
//! A [`Config`] value is passed explicitly to entity registration and to the
//! lifecycle functions. For convenience a process-wide default is kept behind
//! a read-mostly lock: [`current`] hands out a snapshot and [`configure`]
//! swaps in an edited copy. Snapshots already handed out are unaffected.
//!
//! # Settings
//!
//! | Setting | Default | Used by |
//! |---------|---------|---------|
//! | `foreign_key_naming` | snake (`author_id`) | relation join columns |
//! | `constraint_naming` | snake (`FK_posts_author`) | foreign key constraints |
//! | `index_naming` | snake (`IDX_posts_title`) | index/unique declarations |
//! | `typemap` | MySQL | column type resolution |
//! | `collation` | `utf8mb4_0900_as_cs` / `utf8mb4_0900_ai_ci` | entity and string columns |
//! | `use_hooks_for_validation` | `true` | hook installation on register |
//! | `trace` | off | annotation tracing |
//! | `transform_error` | none | validation failures |
//!
//! # Example
//!
//! ```rust
//! use entity_schema::config::{self, Dialect, ForeignKeyNaming};
//!
//! config::configure(|cfg| {
//!     cfg.typemap = Dialect::Postgres.typemap();
//!     cfg.foreign_key_naming = ForeignKeyNaming::Camel;
//! });
//! assert_eq!(config::current().foreign_key_naming.column_name("author"), "authorId");
//! # config::reset();
//! ```

mod naming;
mod typemap;

use std::{
    fmt,
    sync::{Arc, LazyLock, PoisonError, RwLock}
};

pub use naming::{ConstraintNaming, ForeignKeyNaming, IndexNaming, plural};
pub use typemap::{ColumnType, Dialect, LogicalType, Typemap};

use crate::error::{BoxError, Error, ValidationError};

/// Maps a validation failure to the error surfaced to callers.
pub type ErrorTransform = Arc<dyn Fn(ValidationError) -> BoxError + Send + Sync>;

/// Collation names used for entities and string columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collations {
    /// Entity default.
    pub default: String,

    /// Used by `ignore_case()` string columns.
    pub ignore_case: String
}

impl Default for Collations {
    fn default() -> Self {
        Self {
            default:     "utf8mb4_0900_as_cs".to_string(),
            ignore_case: "utf8mb4_0900_ai_ci".to_string()
        }
    }
}

/// Which annotation applications are traced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TraceFilter {
    /// Nothing.
    #[default]
    Off,

    /// Every field of every entity.
    All,

    /// Fields whose `Entity.field` contains the pattern, case-insensitively.
    Matching(String)
}

impl TraceFilter {
    /// Whether `entity.field` should be traced.
    #[must_use]
    pub fn matches(&self, entity: &str, field: &str) -> bool {
        match self {
            Self::Off => false,
            Self::All => true,
            Self::Matching(pattern) => format!("{}.{}", entity, field)
                .to_lowercase()
                .contains(&pattern.to_lowercase())
        }
    }
}

/// Library configuration.
#[derive(Clone)]
pub struct Config {
    /// Foreign key column names.
    pub foreign_key_naming: ForeignKeyNaming,

    /// Foreign key constraint names.
    pub constraint_naming: ConstraintNaming,

    /// Index and unique constraint names.
    pub index_naming: IndexNaming,

    /// Column type names.
    pub typemap: Typemap,

    /// Collation names.
    pub collation: Collations,

    /// Install before-insert/before-update validation hooks on register.
    pub use_hooks_for_validation: bool,

    /// Annotation tracing.
    pub trace: TraceFilter,

    /// Optional mapping of validation failures.
    pub transform_error: Option<ErrorTransform>
}

impl Config {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            foreign_key_naming:       ForeignKeyNaming::default(),
            constraint_naming:        ConstraintNaming::default(),
            index_naming:             IndexNaming::default(),
            typemap:                  Typemap::default(),
            collation:                Collations::default(),
            use_hooks_for_validation: true,
            trace:                    TraceFilter::default(),
            transform_error:          None
        }
    }

    /// Use the built-in typemap of `dialect`.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.typemap = dialect.typemap();
        self
    }

    /// Replace the foreign key naming strategy.
    #[must_use]
    pub fn with_foreign_key_naming(mut self, naming: ForeignKeyNaming) -> Self {
        self.foreign_key_naming = naming;
        self
    }

    /// Replace the constraint naming strategy.
    #[must_use]
    pub fn with_constraint_naming(mut self, naming: ConstraintNaming) -> Self {
        self.constraint_naming = naming;
        self
    }

    /// Replace the index naming strategy.
    #[must_use]
    pub fn with_index_naming(mut self, naming: IndexNaming) -> Self {
        self.index_naming = naming;
        self
    }

    /// Replace the trace filter.
    #[must_use]
    pub fn with_trace(mut self, trace: TraceFilter) -> Self {
        self.trace = trace;
        self
    }

    /// Toggle hook installation.
    #[must_use]
    pub fn with_hooks_for_validation(mut self, enabled: bool) -> Self {
        self.use_hooks_for_validation = enabled;
        self
    }

    /// Map validation failures through `transform`.
    #[must_use]
    pub fn with_error_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(ValidationError) -> BoxError + Send + Sync + 'static
    {
        self.transform_error = Some(Arc::new(transform));
        self
    }

    /// Turn a validation failure into the error surfaced to callers.
    #[must_use]
    pub fn validation_failure(&self, error: ValidationError) -> Error {
        match &self.transform_error {
            Some(transform) => Error::Transformed(transform(error)),
            None => Error::Validation(error)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("foreign_key_naming", &self.foreign_key_naming)
            .field("constraint_naming", &self.constraint_naming)
            .field("index_naming", &self.index_naming)
            .field("typemap", &self.typemap)
            .field("collation", &self.collation)
            .field("use_hooks_for_validation", &self.use_hooks_for_validation)
            .field("trace", &self.trace)
            .field("transform_error", &self.transform_error.is_some())
            .finish()
    }
}

static CURRENT: LazyLock<RwLock<Arc<Config>>> = LazyLock::new(|| RwLock::new(Arc::new(Config::new())));

/// Snapshot of the process-wide configuration.
#[must_use]
pub fn current() -> Arc<Config> {
    Arc::clone(&CURRENT.read().unwrap_or_else(PoisonError::into_inner))
}

/// Edit the process-wide configuration.
pub fn configure(edit: impl FnOnce(&mut Config)) {
    let mut guard = CURRENT.write().unwrap_or_else(PoisonError::into_inner);
    let mut next = Config::clone(&guard);
    edit(&mut next);
    *guard = Arc::new(next);
}

/// Restore the process-wide configuration to its defaults.
pub fn reset() {
    *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(Config::new());
}
