// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validation run before an entity is written.
//!
//! # Passes
//!
//! ```text
//! record ──► assign foreign keys ──► first pass ──┬── no derivations ──► Ok
//!                                                 │
//!                                                 └── derive ──► second pass ──► Ok
//!                  any failing pass ──► ValidationError (through Config::transform_error)
//! ```
//!
//! 1. Foreign key columns are filled from loaded relation objects.
//! 2. The insert or update projection validates the record. Its output
//!    (coerced values, applied defaults) is written back.
//! 3. With derivations, each derived field is computed from the record as
//!    it stands after the first pass and written back, overriding whatever
//!    the caller put there.
//! 4. The revalidation projection, which includes derived fields, checks the
//!    complete record and its output is written back.
//!
//! A failing pass writes nothing back. Every issue of that pass is reported.
//!
//! # Defaults on load
//!
//! [`apply_defaults_record`] fills absent or null fields that carry a default,
//! for rows stored before the defaulted column existed.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::Config,
    entity::EntitySchema,
    error::{DerivationError, Result, ValidationError},
    projection::{Operation, collect_schema},
    schema::Schema,
    validate::{ObjectValidator, ParseOptions, Record}
};

/// Validate `record` for an insert of `entity`.
///
/// # Errors
///
/// A validation failure (mapped by `config`) or a [`DerivationError`].
pub async fn validate_insert_record(
    schema: &Schema,
    entity: &str,
    record: &mut Record,
    config: &Config
) -> Result<()> {
    validate_record(Operation::Insert, schema, entity, record, config).await
}

/// Validate `record` for an update of `entity`.
///
/// # Errors
///
/// A validation failure (mapped by `config`) or a [`DerivationError`].
pub async fn validate_update_record(
    schema: &Schema,
    entity: &str,
    record: &mut Record,
    config: &Config
) -> Result<()> {
    validate_record(Operation::Update, schema, entity, record, config).await
}

async fn validate_record(
    operation: Operation,
    schema: &Schema,
    entity: &str,
    record: &mut Record,
    config: &Config
) -> Result<()> {
    assign_foreign_keys(schema, entity, record);

    let first = operation.project(schema);
    run_pass(&first, operation, 1, entity, record, config).await?;
    if schema.derivations().is_empty() {
        return Ok(());
    }

    apply_derivations(schema, record)?;
    let second = operation.revalidation(schema);
    run_pass(&second, operation, 2, entity, record, config).await
}

async fn run_pass(
    validator: &ObjectValidator,
    operation: Operation,
    pass: u8,
    entity: &str,
    record: &mut Record,
    config: &Config
) -> Result<()> {
    let input = Value::Object(record.clone());
    match validator
        .safe_parse_async(&input, &ParseOptions::reporting_input())
        .await
    {
        Ok(output) => {
            debug!(entity, %operation, pass, fields = output.len(), "validation passed");
            record.extend(output);
            Ok(())
        }
        Err(issues) => {
            debug!(entity, %operation, pass, issues = issues.len(), "validation failed");
            Err(config.validation_failure(ValidationError::new(entity, record.clone(), issues)))
        }
    }
}

/// Copy `id` of loaded relation objects onto their foreign key columns.
///
/// A foreign key already holding a non-null value is left alone.
pub fn assign_foreign_keys(schema: &Schema, entity: &str, record: &mut Record) {
    for (field, column) in schema.columns() {
        let Some(relation) = column.options().foreign_key_for else {
            continue;
        };
        if record.get(field).is_some_and(|value| !value.is_null()) {
            continue;
        }
        let Some(Value::Object(target)) = record.get(&relation) else {
            continue;
        };
        match target.get("id") {
            Some(id) if !id.is_null() => {
                let id = id.clone();
                record.insert(field.to_string(), id);
            }
            _ => warn!(entity, field, relation = %relation, "relation object has no id")
        }
    }
}

/// Compute every derived field of `schema` and write it onto `record`.
///
/// All derivations see the record as it was before any of them ran.
///
/// # Errors
///
/// The first failing derivation, wrapped with its field.
pub fn apply_derivations(schema: &Schema, record: &mut Record) -> Result<(), DerivationError> {
    let derived = schema
        .derivations()
        .iter()
        .map(|(field, derivation)| {
            derivation
                .apply(record)
                .map(|value| (field.clone(), value))
                .map_err(|source| DerivationError {
                    field: field.clone(),
                    source
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    record.extend(derived);
    Ok(())
}

/// Fill absent or null fields of `record` whose column carries a default.
pub fn apply_defaults_record(schema: &Schema, record: &mut Record) {
    for (field, column) in schema.columns() {
        if record.get(field).is_some_and(|value| !value.is_null()) {
            continue;
        }
        if let Some(value) = column.default_value() {
            record.insert(field.to_string(), value);
        }
    }
}

/// Validate a typed entity for an insert, writing validated and derived
/// values back onto it.
///
/// # Errors
///
/// See [`validate_insert_record`]; [`Error::Serde`](crate::error::Error::Serde)
/// when `E` does not round-trip through a JSON object.
pub async fn validate_insert<E>(entity: &mut E, config: &Config) -> Result<()>
where
    E: EntitySchema + Serialize + DeserializeOwned
{
    let mut record = to_record(entity)?;
    validate_insert_record(&collect_schema::<E>(), E::NAME, &mut record, config).await?;
    *entity = serde_json::from_value(Value::Object(record))?;
    Ok(())
}

/// Validate a typed entity for an update, writing validated and derived
/// values back onto it.
///
/// # Errors
///
/// See [`validate_insert`].
pub async fn validate_update<E>(entity: &mut E, config: &Config) -> Result<()>
where
    E: EntitySchema + Serialize + DeserializeOwned
{
    let mut record = to_record(entity)?;
    validate_update_record(&collect_schema::<E>(), E::NAME, &mut record, config).await?;
    *entity = serde_json::from_value(Value::Object(record))?;
    Ok(())
}

/// Backfill defaults on a freshly loaded typed entity.
///
/// # Errors
///
/// [`Error::Serde`](crate::error::Error::Serde) when `E` does not round-trip
/// through a JSON object.
pub fn apply_defaults<E>(entity: &mut E) -> Result<()>
where
    E: EntitySchema + Serialize + DeserializeOwned
{
    let mut record = to_record(entity)?;
    apply_defaults_record(&collect_schema::<E>(), &mut record);
    *entity = serde_json::from_value(Value::Object(record))?;
    Ok(())
}

fn to_record<E: EntitySchema + Serialize>(entity: &E) -> Result<Record> {
    match serde_json::to_value(entity)? {
        Value::Object(record) => Ok(record),
        _ => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "`{}` does not serialize to an object",
            E::NAME
        ))
        .into())
    }
}

/// Validation hooks callable on any serializable entity.
#[async_trait]
pub trait ValidationHooks: Send {
    /// Run insert validation on `self`.
    async fn before_insert(&mut self, config: &Config) -> Result<()>;

    /// Run update validation on `self`.
    async fn before_update(&mut self, config: &Config) -> Result<()>;

    /// Backfill defaults after a load.
    fn after_load(&mut self) -> Result<()>;
}

#[async_trait]
impl<E> ValidationHooks for E
where
    E: EntitySchema + Serialize + DeserializeOwned + Send
{
    async fn before_insert(&mut self, config: &Config) -> Result<()> {
        validate_insert(self, config).await
    }

    async fn before_update(&mut self, config: &Config) -> Result<()> {
        validate_update(self, config).await
    }

    fn after_load(&mut self) -> Result<()> {
        apply_defaults(self)
    }
}
