//! Hydration layer - converts between field values and SQLite values
//!
//! Rows are read into name-addressed [`Record`]s using the column names the
//! statement reports, so entity reconstruction never depends on column order.

use bookkeeper_core::errors::BookkeeperError;
use bookkeeper_core::model::{FieldDef, FieldType, Pk, Record, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Row;

use super::schema::PK_COLUMN;
use crate::errors::{query, Result};

/// Convert a field value into its stored form
pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
        Value::Timestamp(t) => SqlValue::Text(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    }
}

fn stored_type(raw: &ValueRef<'_>) -> &'static str {
    match raw {
        ValueRef::Null => "null",
        ValueRef::Integer(_) => "integer",
        ValueRef::Real(_) => "real",
        ValueRef::Text(_) => "text",
        ValueRef::Blob(_) => "blob",
    }
}

/// Convert a stored column back into a value of the field's semantic type
///
/// # Errors
///
/// Returns `Hydration` when the stored value cannot represent the field,
/// for example text in an integer column written by another program.
pub fn from_sql(table: &str, field: &FieldDef, raw: ValueRef<'_>) -> Result<Value> {
    let fail = |reason: String| BookkeeperError::Hydration {
        table: table.to_string(),
        field: field.name.to_string(),
        reason,
    };
    let mismatch = || {
        fail(format!(
            "expected {}, stored {}",
            field.ty.name(),
            stored_type(&raw)
        ))
    };

    match (field.ty, raw) {
        (_, ValueRef::Null) => Ok(Value::Null),
        (FieldType::Integer, ValueRef::Integer(i)) => Ok(Value::Integer(i)),
        (FieldType::Real, ValueRef::Real(r)) => Ok(Value::Real(r)),
        (FieldType::Real, ValueRef::Integer(i)) => Ok(Value::Real(i as f64)),
        (FieldType::Boolean, ValueRef::Integer(i)) => Ok(Value::Boolean(i != 0)),
        (FieldType::Text, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|e| fail(format!("invalid UTF-8: {}", e))),
        (FieldType::Timestamp, ValueRef::Text(bytes)) => {
            let text = std::str::from_utf8(bytes).map_err(|e| fail(format!("invalid UTF-8: {}", e)))?;
            DateTime::parse_from_rfc3339(text)
                .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                .map_err(|e| fail(format!("invalid timestamp {:?}: {}", text, e)))
        }
        _ => Err(mismatch()),
    }
}

/// Read one row into its pk and a record of declared fields
///
/// `columns` are the statement's column names in result order. Columns the
/// descriptor does not declare are skipped.
pub fn read_record(
    table: &str,
    fields: &[FieldDef],
    columns: &[String],
    row: &Row<'_>,
) -> Result<(Pk, Record)> {
    let mut pk = None;
    let mut record = Record::new(table);

    for (idx, name) in columns.iter().enumerate() {
        if name == PK_COLUMN {
            pk = Some(row.get::<_, Pk>(idx).map_err(|e| query(table, e))?);
            continue;
        }
        let Some(field) = fields.iter().find(|f| f.name == name) else {
            continue;
        };
        let raw = row.get_ref(idx).map_err(|e| query(table, e))?;
        record.insert(field.name, from_sql(table, field, raw)?);
    }

    let pk = pk.ok_or_else(|| BookkeeperError::Hydration {
        table: table.to_string(),
        field: PK_COLUMN.to_string(),
        reason: "pk column missing from result".to_string(),
    })?;
    Ok((pk, record))
}
