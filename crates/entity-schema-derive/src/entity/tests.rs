// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tests for entity parsing and generation.
//!
//! Tests use `syn::parse_quote!` to build struct definitions with attributes,
//! then check the parsed [`EntityDef`] or the generated tokens.

use syn::DeriveInput;

use super::{def::EntityDef, generate::generate};

fn parse(input: DeriveInput) -> darling::Result<EntityDef> {
    EntityDef::from_derive_input(&input)
}

#[test]
fn table_defaults_to_snake_case() {
    let entity = parse(syn::parse_quote! {
        #[entity(schema = "blog_post")]
        pub struct BlogPost {
            pub id: i64,
        }
    })
    .unwrap();
    assert_eq!(entity.table(), "blog_post");
    assert_eq!(entity.name(), "BlogPost");
}

#[test]
fn explicit_names_win() {
    let entity = parse(syn::parse_quote! {
        #[entity(table = "posts", name = "Article")]
        pub struct Post {
            pub id: i64,
        }
    })
    .unwrap();
    assert_eq!(entity.table(), "posts");
    assert_eq!(entity.name(), "Article");
    assert!(entity.schema.is_none());
}

#[test]
fn mixin_has_no_table() {
    let entity = parse(syn::parse_quote! {
        #[entity(schema = "timestamps", mixin)]
        pub struct Timestamps {}
    })
    .unwrap();
    assert!(entity.mixin);
    assert_eq!(entity.table(), "");
}

#[test]
fn mixin_with_table_is_rejected() {
    let err = parse(syn::parse_quote! {
        #[entity(table = "timestamps", mixin)]
        pub struct Timestamps {}
    })
    .unwrap_err();
    assert!(err.to_string().contains("mixin has no table"));
}

#[test]
fn generics_are_rejected() {
    let err = parse(syn::parse_quote! {
        #[entity(table = "boxes")]
        pub struct Boxed<T> {
            pub value: T,
        }
    })
    .unwrap_err();
    assert!(err.to_string().contains("generic"));
}

#[test]
fn tuple_structs_are_rejected() {
    assert!(
        parse(syn::parse_quote! {
            #[entity(table = "pairs")]
            pub struct Pair(i64, i64);
        })
        .is_err()
    );
}

#[test]
fn generates_parent_and_schema() {
    let entity = parse(syn::parse_quote! {
        #[entity(table = "posts", schema = "schemas::post", parent = "Timestamps", collation = "utf8mb4_bin")]
        pub struct Post {
            pub id: i64,
        }
    })
    .unwrap();
    let tokens = generate(&entity).to_string();
    assert!(tokens.contains("type Parent = Timestamps"));
    assert!(tokens.contains("get_or_init (schemas :: post)"));
    assert!(tokens.contains("\"utf8mb4_bin\""));
    assert!(tokens.contains("const MIXIN : bool = false"));
}

#[test]
fn root_entities_end_at_no_parent() {
    let entity = parse(syn::parse_quote! {
        #[entity(table = "tags")]
        pub struct Tag {
            pub id: i64,
        }
    })
    .unwrap();
    let tokens = generate(&entity).to_string();
    assert!(tokens.contains(":: entity_schema :: entity :: NoParent"));
    assert!(!tokens.contains("fn own_schema"));
    assert!(!tokens.contains("fn options"));
}
