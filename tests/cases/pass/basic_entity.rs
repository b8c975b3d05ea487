// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use entity_schema::{Entity, columns, entity::EntitySchema, schema::Schema};

fn tag() -> Schema {
    Schema::new()
        .column("id", columns::primary())
        .column("label", columns::string().max(40).unique())
}

#[derive(Entity)]
#[entity(schema = "tag")]
pub struct BlogTag {
    pub id:    i64,
    pub label: String
}

fn main() {
    assert_eq!(BlogTag::NAME, "BlogTag");
    assert_eq!(BlogTag::TABLE, "blog_tag");
    assert!(!BlogTag::MIXIN);
    assert_eq!(BlogTag::own_schema().map(Schema::len), Some(2));
}
