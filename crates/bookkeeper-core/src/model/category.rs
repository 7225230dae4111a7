use serde::{Deserialize, Serialize};

use super::entity::{Entity, Pk};
use super::field::{FieldDef, FieldType};
use super::record::Record;
use super::value::Value;
use crate::errors::Result;

const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", FieldType::Text),
    FieldDef::new("parent", FieldType::Integer).nullable(),
];

/// Expense category
///
/// Categories form a tree through `parent`, which holds the pk of another
/// category (`None` for top-level categories).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub pk: Option<Pk>,
    pub name: String,
    pub parent: Option<Pk>,
}

impl Category {
    /// Create a new, not yet persisted, category
    pub fn new(name: impl Into<String>, parent: Option<Pk>) -> Self {
        Self {
            pk: None,
            name: name.into(),
            parent,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

impl Entity for Category {
    const NAME: &'static str = "Category";

    fn fields() -> &'static [FieldDef] {
        FIELDS
    }

    fn pk(&self) -> Option<Pk> {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = Some(pk);
    }

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.parent.into()]
    }

    fn from_record(pk: Pk, mut record: Record) -> Result<Self> {
        Ok(Self {
            pk: Some(pk),
            name: record.take("name")?,
            parent: record.take("parent")?,
        })
    }
}
