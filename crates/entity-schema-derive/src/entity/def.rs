// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validated entity definition.

use convert_case::{Case, Casing};
use darling::FromDeriveInput;
use syn::{DeriveInput, Ident};

use super::attrs::EntityAttrs;

/// Everything the generator needs about one entity.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Explicit table name.
    table: Option<String>,

    /// Explicit entity name.
    name: Option<String>,

    /// Own schema function.
    pub schema: Option<syn::Path>,

    /// Parent entity.
    pub parent: Option<syn::Path>,

    /// Abstract field carrier.
    pub mixin: bool,

    /// Entity collation.
    pub collation: Option<String>
}

impl EntityDef {
    /// Parse entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to anything but a struct with named fields
    /// - Generic struct
    /// - `table` on a mixin
    /// - Invalid attribute values
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;
        let mut errors = darling::Error::accumulator();

        if !attrs.generics.params.is_empty() {
            errors.push(
                darling::Error::custom("Entity cannot be derived for generic structs")
                    .with_span(&attrs.generics)
            );
        }
        if attrs.mixin && attrs.table.is_some() {
            errors.push(
                darling::Error::custom("a mixin has no table; remove `table` or `mixin`")
                    .with_span(&attrs.ident)
            );
        }
        if matches!(&attrs.table, Some(table) if table.is_empty()) {
            errors.push(darling::Error::custom("`table` must not be empty").with_span(&attrs.ident));
        }
        errors.finish()?;

        Ok(Self {
            ident:     attrs.ident,
            table:     attrs.table,
            name:      attrs.name,
            schema:    attrs.schema,
            parent:    attrs.parent,
            mixin:     attrs.mixin,
            collation: attrs.collation
        })
    }

    /// Entity name.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.ident.to_string())
    }

    /// Table name; empty for mixins.
    pub fn table(&self) -> String {
        if self.mixin {
            return String::new();
        }
        self.table
            .clone()
            .unwrap_or_else(|| self.ident.to_string().to_case(Case::Snake))
    }
}
