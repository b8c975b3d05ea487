// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level attribute parsing with darling.
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `table` | No | snake_case struct name | Table name |
//! | `name` | No | struct name | Entity name |
//! | `schema` | No | none | `fn() -> Schema` with the entity's own fields |
//! | `parent` | No | `NoParent` | Entity whose schema is inherited |
//! | `mixin` | No | `false` | Abstract field carrier |
//! | `collation` | No | configured default | Entity collation |

use darling::FromDeriveInput;
use syn::{Generics, Ident};

/// Entity-level attributes parsed from `#[entity(...)]`.
///
/// # Example
///
/// ```rust,ignore
/// #[entity(
///     table = "posts",
///     schema = "schemas::post",
///     parent = "Timestamps",
///     collation = "utf8mb4_bin"
/// )]
/// ```
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
pub struct EntityAttrs {
    /// Struct identifier (e.g., `Post`).
    pub ident: Ident,

    /// Struct generics; must be empty.
    pub generics: Generics,

    /// Table name.
    #[darling(default)]
    pub table: Option<String>,

    /// Entity name.
    #[darling(default)]
    pub name: Option<String>,

    /// Function building the entity's own schema.
    #[darling(default)]
    pub schema: Option<syn::Path>,

    /// Parent entity.
    #[darling(default)]
    pub parent: Option<syn::Path>,

    /// Abstract field carrier.
    #[darling(default)]
    pub mixin: bool,

    /// Entity collation.
    #[darling(default)]
    pub collation: Option<String>
}
