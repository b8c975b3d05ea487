// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Logical column types and their per-dialect names.
//!
//! Column constructors record a [`LogicalType`]; the dialect name is resolved
//! through the [`Typemap`] of the configuration in effect when annotations are
//! built, so one schema can target several databases.
//!
//! ```text
//! ┌────────────┬──────────┬───────────┬───────────┐
//! │ Logical    │ abstract │ postgres  │ mysql     │
//! ├────────────┼──────────┼───────────┼───────────┤
//! │ Boolean    │ boolean  │ bool      │ tinyint   │
//! │ Number     │ int      │ int4      │ int       │
//! │ Int32      │ int      │ int4      │ int       │
//! │ BigInt     │ bigint   │ int8      │ bigint    │
//! │ Float      │ float    │ float4    │ float     │
//! │ Float32    │ float    │ float4    │ float     │
//! │ Float64    │ float    │ float8    │ double    │
//! │ Enum       │ enum     │ enum      │ enum      │
//! │ String     │ varchar  │ varchar   │ varchar   │
//! │ Binary     │ blob     │ bytea     │ binary    │
//! │ Date       │ date     │ timestamp │ datetime  │
//! │ Timestamp  │ datetime │ timestamp │ timestamp │
//! │ Json       │ json     │ jsonb     │ json      │
//! └────────────┴──────────┴───────────┴───────────┘
//! ```

use std::fmt;

/// Database-independent column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Boolean flag.
    Boolean,
    /// Generic number.
    Number,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    BigInt,
    /// Default float.
    Float,
    /// Single precision float.
    Float32,
    /// Double precision float.
    Float64,
    /// Enumeration.
    Enum,
    /// Variable-length string.
    String,
    /// Binary blob.
    Binary,
    /// Calendar date.
    Date,
    /// Date and time.
    Timestamp,
    /// JSON document.
    Json
}

/// Column type as recorded in options: logical, or a literal dialect name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Resolved through the active [`Typemap`].
    Logical(LogicalType),

    /// Used verbatim.
    Named(String)
}

impl ColumnType {
    /// Dialect name under `typemap`.
    #[must_use]
    pub fn resolve(&self, typemap: &Typemap) -> String {
        match self {
            Self::Logical(logical) => typemap.resolve(*logical).to_string(),
            Self::Named(name) => name.clone()
        }
    }
}

impl From<LogicalType> for ColumnType {
    fn from(logical: LogicalType) -> Self {
        Self::Logical(logical)
    }
}

impl From<&str> for ColumnType {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ColumnType {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Target dialect with a built-in typemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Driver-neutral names.
    Abstract,

    /// PostgreSQL.
    Postgres,

    /// MySQL / MariaDB.
    #[default]
    Mysql
}

impl Dialect {
    /// Built-in typemap of this dialect.
    #[must_use]
    pub fn typemap(self) -> Typemap {
        match self {
            Self::Abstract => Typemap::abstract_types(),
            Self::Postgres => Typemap::postgres(),
            Self::Mysql => Typemap::mysql()
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abstract => "abstract",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql"
        })
    }
}

/// Dialect type names per [`LogicalType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typemap {
    /// Boolean flags.
    pub boolean:     String,
    /// Generic numbers.
    pub number:      String,
    /// 32-bit integers.
    pub int32:       String,
    /// 64-bit integers.
    pub bigint:      String,
    /// Default floats.
    pub float:       String,
    /// Single precision floats.
    pub float32:     String,
    /// Double precision floats.
    pub float64:     String,
    /// Enumerations.
    pub enumeration: String,
    /// Strings.
    pub string:      String,
    /// Binary payloads.
    pub binary:      String,
    /// Dates.
    pub date:        String,
    /// Timestamps.
    pub timestamp:   String,
    /// JSON documents.
    pub json:        String
}

impl Typemap {
    fn from_names(names: [&str; 13]) -> Self {
        let [
            boolean,
            number,
            int32,
            bigint,
            float,
            float32,
            float64,
            enumeration,
            string,
            binary,
            date,
            timestamp,
            json
        ] = names.map(str::to_string);
        Self {
            boolean,
            number,
            int32,
            bigint,
            float,
            float32,
            float64,
            enumeration,
            string,
            binary,
            date,
            timestamp,
            json
        }
    }

    /// Driver-neutral names.
    #[must_use]
    pub fn abstract_types() -> Self {
        Self::from_names([
            "boolean", "int", "int", "bigint", "float", "float", "float", "enum", "varchar", "blob",
            "date", "datetime", "json"
        ])
    }

    /// PostgreSQL names.
    #[must_use]
    pub fn postgres() -> Self {
        Self::from_names([
            "bool", "int4", "int4", "int8", "float4", "float4", "float8", "enum", "varchar",
            "bytea", "timestamp", "timestamp", "jsonb"
        ])
    }

    /// MySQL names.
    #[must_use]
    pub fn mysql() -> Self {
        Self::from_names([
            "tinyint", "int", "int", "bigint", "float", "float", "double", "enum", "varchar",
            "binary", "datetime", "timestamp", "json"
        ])
    }

    /// Name for `logical`.
    #[must_use]
    pub fn resolve(&self, logical: LogicalType) -> &str {
        match logical {
            LogicalType::Boolean => &self.boolean,
            LogicalType::Number => &self.number,
            LogicalType::Int32 => &self.int32,
            LogicalType::BigInt => &self.bigint,
            LogicalType::Float => &self.float,
            LogicalType::Float32 => &self.float32,
            LogicalType::Float64 => &self.float64,
            LogicalType::Enum => &self.enumeration,
            LogicalType::String => &self.string,
            LogicalType::Binary => &self.binary,
            LogicalType::Date => &self.date,
            LogicalType::Timestamp => &self.timestamp,
            LogicalType::Json => &self.json
        }
    }
}

impl Default for Typemap {
    fn default() -> Self {
        Dialect::default().typemap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_mysql() {
        assert_eq!(Typemap::default(), Typemap::mysql());
        assert_eq!(Dialect::default().to_string(), "mysql");
    }

    #[test]
    fn resolves_per_dialect() {
        assert_eq!(Typemap::postgres().resolve(LogicalType::Boolean), "bool");
        assert_eq!(Typemap::mysql().resolve(LogicalType::Boolean), "tinyint");
        assert_eq!(Typemap::abstract_types().resolve(LogicalType::Binary), "blob");
        assert_eq!(Typemap::mysql().resolve(LogicalType::Float64), "double");
        assert_eq!(Typemap::postgres().resolve(LogicalType::Timestamp), "timestamp");
    }

    #[test]
    fn named_types_pass_through() {
        let ty = ColumnType::from("citext");
        assert_eq!(ty.resolve(&Typemap::postgres()), "citext");
    }

    #[test]
    fn logical_types_follow_typemap() {
        let ty = ColumnType::from(LogicalType::Int32);
        assert_eq!(ty.resolve(&Typemap::postgres()), "int4");
        assert_eq!(ty.resolve(&Typemap::mysql()), "int");
    }

    #[test]
    fn custom_typemap_fields() {
        let mut typemap = Typemap::postgres();
        typemap.string = "text".to_string();
        assert_eq!(ColumnType::from(LogicalType::String).resolve(&typemap), "text");
    }
}
