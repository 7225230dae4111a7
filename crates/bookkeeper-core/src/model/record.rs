use std::collections::BTreeMap;

use super::field::FieldDef;
use super::value::{FromValue, Value};
use crate::errors::{BookkeeperError, Result};

/// Name-addressed column values of one row
///
/// Entities are rebuilt from a `Record` by field name, so reconstruction
/// does not depend on the column order the store returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    table: String,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record for rows of `table`
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: BTreeMap::new(),
        }
    }

    /// Build a record from values given in descriptor order
    ///
    /// Surplus values beyond the descriptor are dropped.
    pub fn from_positional(
        table: impl Into<String>,
        fields: &[FieldDef],
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        let mut record = Self::new(table);
        for (field, value) in fields.iter().zip(values) {
            record.insert(field.name, value);
        }
        record
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove a column and convert it to `T`
    ///
    /// # Errors
    ///
    /// Returns `Hydration` if the column is absent or holds the wrong kind of
    /// value.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T> {
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| BookkeeperError::Hydration {
                table: self.table.clone(),
                field: name.to_string(),
                reason: "column missing from row".to_string(),
            })?;

        T::from_value(value).map_err(|reason| BookkeeperError::Hydration {
            table: self.table.clone(),
            field: name.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::model::field::FieldType;

    const FIELDS: &[FieldDef] = &[
        FieldDef::new("name", FieldType::Text),
        FieldDef::new("amount", FieldType::Integer),
    ];

    #[test]
    fn test_from_positional_binds_in_descriptor_order() {
        let mut record = Record::from_positional(
            "purchase",
            FIELDS,
            vec![Value::from("eggs"), Value::from(12_i64)],
        );

        assert_eq!(record.len(), 2);
        assert_eq!(record.take::<String>("name").unwrap(), "eggs");
        assert_eq!(record.take::<i64>("amount").unwrap(), 12);
        assert!(record.is_empty());
    }

    #[test]
    fn test_take_missing_column() {
        let mut record = Record::new("purchase");
        let err = record.take::<String>("name").unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert!(err.to_string().contains("column missing"));
    }

    #[test]
    fn test_take_wrong_kind() {
        let mut record = Record::new("purchase");
        record.insert("amount", Value::from("twelve"));

        let err = record.take::<i64>("amount").unwrap_err();
        assert_eq!(
            err,
            BookkeeperError::Hydration {
                table: "purchase".to_string(),
                field: "amount".to_string(),
                reason: "expected integer, found text".to_string(),
            }
        );
    }
}
