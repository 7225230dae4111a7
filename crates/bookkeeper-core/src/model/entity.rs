use super::field::FieldDef;
use super::record::Record;
use super::value::Value;
use crate::errors::{BookkeeperError, Result};

/// Identity (primary key) of a persisted entity
pub type Pk = i64;

/// Contract every persisted domain type fulfils
///
/// The identity field `pk` is implicit and never appears in [`Entity::fields`].
/// It is `None` until a repository assigns one on insert.
pub trait Entity: Sized {
    /// Type name; its lower-cased form names the table
    const NAME: &'static str;

    /// Ordered field descriptor, excluding the identity field
    ///
    /// The order fixes both the column order of the table and the binding
    /// order of generated statements, so it must not change between calls.
    fn fields() -> &'static [FieldDef];

    fn pk(&self) -> Option<Pk>;

    fn set_pk(&mut self, pk: Pk);

    /// Current field values in descriptor order
    fn values(&self) -> Vec<Value>;

    /// Keyword-style construction from a name-addressed record
    ///
    /// # Errors
    ///
    /// Returns `Hydration` if a declared field is missing or holds the wrong
    /// kind of value.
    fn from_record(pk: Pk, record: Record) -> Result<Self>;

    /// Table identifier derived from the type name
    fn table_name() -> String {
        Self::NAME.to_lowercase()
    }

    /// Descriptor entry for `name`, if declared
    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Field values addressed by name
    fn to_record(&self) -> Record {
        Record::from_positional(Self::table_name(), Self::fields(), self.values())
    }
}

/// Check `values` against `fields` before they are bound to a statement
///
/// Returns the values converted to each field's semantic type.
///
/// # Errors
///
/// Returns `FieldTypeMismatch` for a value of the wrong kind and `Internal`
/// if the value count differs from the descriptor.
pub fn coerce_values(table: &str, fields: &[FieldDef], values: Vec<Value>) -> Result<Vec<Value>> {
    if values.len() != fields.len() {
        return Err(BookkeeperError::Internal {
            message: format!(
                "entity for table {} produced {} values for {} fields",
                table,
                values.len(),
                fields.len()
            ),
        });
    }

    fields
        .iter()
        .zip(values)
        .map(|(field, value)| {
            field
                .coerce(value)
                .map_err(|found| BookkeeperError::FieldTypeMismatch {
                    table: table.to_string(),
                    field: field.name.to_string(),
                    expected: field.ty.name().to_string(),
                    found: field.describe_rejected(&found),
                })
        })
        .collect()
}
