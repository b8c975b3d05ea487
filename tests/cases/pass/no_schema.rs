// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use entity_schema::{Entity, entity::EntitySchema, projection::collect_schema};

#[derive(Entity)]
#[entity(table = "audit_entries", name = "AuditEntry")]
pub struct Audit {
    pub message: String
}

fn main() {
    assert_eq!(Audit::NAME, "AuditEntry");
    assert!(Audit::own_schema().is_none());
    assert!(collect_schema::<Audit>().is_empty());
}
