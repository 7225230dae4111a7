use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Semantic type of a persisted field
///
/// Each type has a fixed storage affinity used when the table is created and
/// when values are bound or read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    /// Stored as INTEGER 0/1
    Boolean,
    /// Stored as RFC 3339 TEXT in UTC
    Timestamp,
}

impl FieldType {
    /// SQL column type used in `CREATE TABLE`
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Integer | FieldType::Boolean => "INTEGER",
            FieldType::Real => "REAL",
            FieldType::Text | FieldType::Timestamp => "TEXT",
        }
    }

    /// Lower-case name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
        }
    }
}

/// One entry of an entity's field descriptor
///
/// Descriptors are declared statically, in the order the columns should
/// appear in the table:
///
/// ```
/// use bookkeeper_core::model::{FieldDef, FieldType};
///
/// const FIELDS: &[FieldDef] = &[
///     FieldDef::new("name", FieldType::Text),
///     FieldDef::new("parent", FieldType::Integer).nullable(),
/// ];
/// assert!(FIELDS[1].nullable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
}

impl FieldDef {
    /// A required (NOT NULL) field
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
        }
    }

    /// Mark the field as accepting NULL
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Convert `value` to this field's semantic type
    ///
    /// Integers widen to reals for `Real` fields. `Null` always passes, so
    /// NOT NULL enforcement stays with the store. Any other mismatch returns
    /// the value back as the error, as do reals that are not finite (SQLite
    /// stores NaN as NULL) and timestamps outside years 0 to 9999 (RFC 3339
    /// has no form for them).
    pub fn coerce(&self, value: Value) -> std::result::Result<Value, Value> {
        match (self.ty, value) {
            (_, Value::Null) => Ok(Value::Null),
            (FieldType::Integer, v @ Value::Integer(_)) => Ok(v),
            (FieldType::Real, Value::Real(r)) if r.is_finite() => Ok(Value::Real(r)),
            (FieldType::Real, Value::Integer(i)) => Ok(Value::Real(i as f64)),
            (FieldType::Text, v @ Value::Text(_)) => Ok(v),
            (FieldType::Boolean, v @ Value::Boolean(_)) => Ok(v),
            (FieldType::Timestamp, Value::Timestamp(t)) if is_storable(&t) => {
                Ok(Value::Timestamp(t))
            }
            (_, other) => Err(other),
        }
    }

    /// How a value rejected by [`FieldDef::coerce`] is named in errors
    ///
    /// A value of the right kind was rejected for its range, which the bare
    /// type name would hide.
    pub fn describe_rejected(&self, value: &Value) -> String {
        match value {
            Value::Real(r) if self.ty == FieldType::Real => format!("non-finite real {}", r),
            Value::Timestamp(t) if self.ty == FieldType::Timestamp => {
                format!("timestamp out of range (year {})", t.year())
            }
            other => other.type_name().to_string(),
        }
    }
}

fn is_storable(t: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&t.year())
}
