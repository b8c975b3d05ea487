// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # entity-schema
//!
//! Describe an entity's fields once, as columns, and get both insert/update
//! validation and the persistence metadata an ORM needs.
//!
//! ```text
//! columns::string().max(120).unique()
//!        │
//!        ├── validation node (Type)  ──► insert_schema / update_schema
//!        └── root metadata (Registry) ──► Annotation ──► PersistenceAdapter
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use entity_schema::prelude::*;
//! use serde_json::{Value, json};
//!
//! let mut user = schema([
//!     ("id", ColumnDef::from(columns::primary().generated(GenerationStrategy::Increment))),
//!     ("email", columns::string().email().unique().into()),
//!     ("active", columns::boolean().into())
//! ]);
//! user.derive("active", |user| Ok(json!(user.get("email").is_some_and(|e| !e.is_null()))))?;
//!
//! let insert = insert_schema(&user);
//! assert!(insert.get("id").is_some_and(Type::is_optional));
//! assert!(!insert.contains("active"));
//! assert!(!update_schema(&user).contains("id"));
//! # Ok::<(), entity_schema::error::ConfigError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`validate`] | chainable validation nodes and object validators |
//! | [`registry`] | node → root → metadata resolution |
//! | [`column`] | typed column builders and their modifiers |
//! | [`columns`] | column constructors |
//! | [`schema`] | field maps, derivations, table constraints |
//! | [`projection`] | insert/update validators, inheritance |
//! | [`entity`] | entity trait and registration |
//! | [`adapter`] | the ORM seam |
//! | [`lifecycle`] | two-pass validation, defaults on load |
//! | [`config`] | naming, typemaps, collation, error transform |
//! | [`error`] | error types |

extern crate self as entity_schema;

pub mod adapter;
pub mod column;
pub mod columns;
pub mod config;
pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod prelude;
pub mod projection;
pub mod registry;
pub mod schema;
pub mod validate;

/// Re-export async_trait for generated code.
pub use async_trait::async_trait;
#[cfg(feature = "derive")]
#[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
pub use entity_schema_derive::Entity;
