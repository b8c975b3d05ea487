// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── attrs.rs     → EntityAttrs (darling parsing struct)
//! ├── def.rs       → EntityDef (validated definition + accessors)
//! └── generate.rs  → EntitySchema impl
//! ```

mod attrs;
mod def;
mod generate;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::def::EntityDef;

/// Main entry point for the Entity derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => generate::generate(&entity).into(),
        Err(err) => err.write_errors().into()
    }
}

#[cfg(test)]
mod tests;
