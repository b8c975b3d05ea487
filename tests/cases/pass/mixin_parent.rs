// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use entity_schema::{Entity, columns, entity::EntitySchema, projection::collect_schema, schema::Schema};

mod schemas {
    use super::*;

    pub fn timestamps() -> Schema {
        Schema::new()
            .column("created_at", columns::create_date())
            .column("updated_at", columns::update_date())
    }

    pub fn post() -> Schema {
        Schema::new()
            .column("id", columns::primary())
            .column("title", columns::string())
    }
}

#[derive(Entity)]
#[entity(schema = "schemas::timestamps", mixin)]
pub struct Timestamps {}

#[derive(Entity)]
#[entity(table = "posts", schema = "schemas::post", parent = "Timestamps", collation = "utf8mb4_bin")]
pub struct Post {
    pub id:    i64,
    pub title: String
}

fn main() {
    assert!(Timestamps::MIXIN);
    assert_eq!(Timestamps::TABLE, "");
    assert_eq!(Post::options().collation.as_deref(), Some("utf8mb4_bin"));
    assert_eq!(collect_schema::<Post>().len(), 4);
}
