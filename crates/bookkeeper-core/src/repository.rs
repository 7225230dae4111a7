//! Abstract repository contract
//!
//! A repository persists entities of one type. Each call is self-contained:
//! no state carries over between calls apart from the stored rows, so every
//! method takes `&self`.

use crate::errors::{BookkeeperError, Result};
use crate::model::{Entity, FieldDef, Pk, Value};

/// Conjunction of `field = value` conditions for `get_all`
///
/// ```
/// use bookkeeper_core::repository::Filter;
///
/// let filter = Filter::new().eq("name", "milk").eq("amount", 2_i64);
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Match every condition against the descriptor
    ///
    /// Returns each condition's field definition with the value converted to
    /// that field's type, in the order the conditions were added.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if a key is not a declared field and `Query` if
    /// a value cannot be compared with its field.
    pub fn resolve<'a>(
        &self,
        table: &str,
        fields: &'a [FieldDef],
    ) -> Result<Vec<(&'a FieldDef, Value)>> {
        self.conditions
            .iter()
            .map(|(name, value)| {
                let field = fields.iter().find(|f| f.name == name).ok_or_else(|| {
                    BookkeeperError::UnknownField {
                        table: table.to_string(),
                        field: name.clone(),
                    }
                })?;
                let value = field
                    .coerce(value.clone())
                    .map_err(|found| BookkeeperError::Query {
                        table: table.to_string(),
                        message: format!(
                            "cannot compare {} field {} with a {} value",
                            field.ty.name(),
                            field.name,
                            field.describe_rejected(&found)
                        ),
                    })?;
                Ok((field, value))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (k, v)| filter.eq(k, v))
    }
}

/// Persistence contract for entities of type `T`
pub trait Repository<T: Entity> {
    /// Insert `entity`, write the assigned pk into it, and return that pk
    ///
    /// # Errors
    ///
    /// Returns a constraint error if the row is rejected.
    fn add(&self, entity: &mut T) -> Result<Pk>;

    /// Fetch by pk; `Ok(None)` when no row matches
    fn get(&self, pk: Pk) -> Result<Option<T>>;

    /// Fetch every entity matching all conditions of `filter`
    ///
    /// # Errors
    ///
    /// Returns a query error if the filter names an undeclared field.
    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>>;

    /// Overwrite every declared field of the stored row
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no row has the entity's pk.
    fn update(&self, entity: &T) -> Result<()>;

    /// Remove the row with `pk`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no row has that pk.
    fn delete(&self, pk: Pk) -> Result<()>;

    /// Remove every row
    fn delete_all(&self) -> Result<()>;
}
