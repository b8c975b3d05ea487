// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Naming strategies for generated identifiers.
//!
//! | Strategy | Input | Snake | Camel |
//! |----------|-------|-------|-------|
//! | [`ForeignKeyNaming`] | `author` | `author_id` | `authorId` |
//! | [`ConstraintNaming`] | `blog_posts`, `author` | `FK_blogPosts_author` | `FK_blogPosts_author` |
//! | [`IndexNaming`] | `blog_posts`, `createdAt`, unique | `UQ_blogPosts_created_at` | `UQ_blogPosts_createdAt` |

use std::{fmt, sync::Arc};

use convert_case::{Case, Casing};

type FieldFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
type TableFieldFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;
type IndexFn = Arc<dyn Fn(&str, &str, bool) -> String + Send + Sync>;

/// Column name of a relation's foreign key.
#[derive(Clone, Default)]
pub enum ForeignKeyNaming {
    /// `author` -> `author_id`.
    #[default]
    Snake,

    /// `author` -> `authorId`.
    Camel,

    /// Caller-supplied rule.
    Custom(FieldFn)
}

impl ForeignKeyNaming {
    /// Wrap a custom rule.
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static
    {
        Self::Custom(Arc::new(rule))
    }

    /// Foreign key column for the relation field `field`.
    #[must_use]
    pub fn column_name(&self, field: &str) -> String {
        match self {
            Self::Snake => format!("{}_id", field.to_case(Case::Snake)),
            Self::Camel => format!("{}Id", field.to_case(Case::Camel)),
            Self::Custom(rule) => rule(field)
        }
    }
}

/// Name of a foreign key constraint.
#[derive(Clone, Default)]
pub enum ConstraintNaming {
    /// `FK_{camel(table)}_{snake(field)}`.
    #[default]
    Snake,

    /// `FK_{camel(table)}_{camel(field)}`.
    Camel,

    /// Caller-supplied rule taking the table and field.
    Custom(TableFieldFn)
}

impl ConstraintNaming {
    /// Wrap a custom rule.
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static
    {
        Self::Custom(Arc::new(rule))
    }

    /// Constraint name for `field` on `table`.
    #[must_use]
    pub fn name(&self, table: &str, field: &str) -> String {
        match self {
            Self::Snake => format!("FK_{}_{}", table.to_case(Case::Camel), field.to_case(Case::Snake)),
            Self::Camel => format!("FK_{}_{}", table.to_case(Case::Camel), field.to_case(Case::Camel)),
            Self::Custom(rule) => rule(table, field)
        }
    }
}

/// Name of an index or unique constraint.
#[derive(Clone, Default)]
pub enum IndexNaming {
    /// `{IDX|UQ}_{camel(table)}_{snake(field)}`.
    #[default]
    Snake,

    /// `{IDX|UQ}_{camel(table)}_{camel(field)}`.
    Camel,

    /// Caller-supplied rule taking the table, field and uniqueness.
    Custom(IndexFn)
}

impl IndexNaming {
    /// Wrap a custom rule.
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(&str, &str, bool) -> String + Send + Sync + 'static
    {
        Self::Custom(Arc::new(rule))
    }

    /// Index name for `field` on `table`.
    #[must_use]
    pub fn name(&self, table: &str, field: &str, unique: bool) -> String {
        let prefix = if unique { "UQ" } else { "IDX" };
        match self {
            Self::Snake => format!("{}_{}_{}", prefix, table.to_case(Case::Camel), field.to_case(Case::Snake)),
            Self::Camel => format!("{}_{}_{}", prefix, table.to_case(Case::Camel), field.to_case(Case::Camel)),
            Self::Custom(rule) => rule(table, field, unique)
        }
    }
}

macro_rules! debug_strategy {
    ($($ty:ident),*) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match self {
                        Self::Snake => f.write_str(concat!(stringify!($ty), "::Snake")),
                        Self::Camel => f.write_str(concat!(stringify!($ty), "::Camel")),
                        Self::Custom(_) => f.write_str(concat!(stringify!($ty), "::Custom(..)"))
                    }
                }
            }
        )*
    };
}

debug_strategy!(ForeignKeyNaming, ConstraintNaming, IndexNaming);

/// Plural of an English table or entity name.
///
/// Covers the regular suffix rules; irregular nouns need an explicit join
/// table name. Words already ending in a plural `s` are returned unchanged.
#[must_use]
pub fn plural(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return word.to_string();
    }
    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}
