// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! # entity-schema-derive
//!
//! `#[derive(Entity)]` for `entity-schema`. Use it through the `entity-schema`
//! crate, which re-exports it behind the default `derive` feature.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use entity_schema::{Entity, columns, schema::Schema};
//!
//! fn timestamps() -> Schema {
//!     Schema::new()
//!         .column("created_at", columns::create_date())
//!         .column("updated_at", columns::update_date())
//! }
//!
//! fn post() -> Schema {
//!     Schema::new()
//!         .column("id", columns::primary())
//!         .column("title", columns::string().max(120))
//! }
//!
//! #[derive(Entity)]
//! #[entity(schema = "timestamps", mixin)]
//! pub struct Timestamps {}
//!
//! #[derive(Entity)]
//! #[entity(table = "posts", schema = "post", parent = "Timestamps")]
//! pub struct Post {
//!     pub id:    Option<i64>,
//!     pub title: String
//! }
//! ```
//!
//! ## Entity Attributes
//!
//! | Attribute | Default | Description |
//! |-----------|---------|-------------|
//! | `table` | snake_case struct name | Table name |
//! | `name` | struct name | Entity name |
//! | `schema` | none | Path of a `fn() -> Schema` declaring own fields |
//! | `parent` | none | Entity whose schema is merged underneath |
//! | `mixin` | `false` | Field carrier only, cannot be registered |
//! | `collation` | configured default | Entity collation |
//!
//! Generates an `EntitySchema` impl whose own schema is built once and kept
//! in a `OnceLock`.

mod entity;

use proc_macro::TokenStream;

/// Derive `EntitySchema`.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
