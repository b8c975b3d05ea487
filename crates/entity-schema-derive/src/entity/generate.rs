// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `EntitySchema` impl generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::entity_schema::entity::EntitySchema for Post {
//!     type Parent = Timestamps;
//!     const NAME: &'static str = "Post";
//!     const TABLE: &'static str = "posts";
//!     const MIXIN: bool = false;
//!
//!     fn own_schema() -> Option<&'static Schema> {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         Some(SCHEMA.get_or_init(post))
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::def::EntityDef;

/// Generate the `EntitySchema` impl.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let name = entity.name();
    let table = entity.table();
    let mixin = entity.mixin;

    let parent = match &entity.parent {
        Some(parent) => quote! { #parent },
        None => quote! { ::entity_schema::entity::NoParent }
    };

    let own_schema = entity.schema.as_ref().map(|schema| {
        quote! {
            fn own_schema() -> ::core::option::Option<&'static ::entity_schema::schema::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::entity_schema::schema::Schema> =
                    ::std::sync::OnceLock::new();
                ::core::option::Option::Some(SCHEMA.get_or_init(#schema))
            }
        }
    });

    let options = entity.collation.as_ref().map(|collation| {
        quote! {
            fn options() -> ::entity_schema::entity::EntityOptions {
                ::entity_schema::entity::EntityOptions {
                    collation: ::core::option::Option::Some(::std::string::String::from(#collation))
                }
            }
        }
    });

    quote! {
        #[automatically_derived]
        impl ::entity_schema::entity::EntitySchema for #ident {
            type Parent = #parent;

            const NAME: &'static str = #name;
            const TABLE: &'static str = #table;
            const MIXIN: bool = #mixin;

            #own_schema
            #options
        }
    }
}
