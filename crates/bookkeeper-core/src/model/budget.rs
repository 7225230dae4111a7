use serde::{Deserialize, Serialize};

use super::entity::{Entity, Pk};
use super::field::{FieldDef, FieldType};
use super::record::Record;
use super::value::Value;
use crate::errors::Result;

const FIELDS: &[FieldDef] = &[
    FieldDef::new("period", FieldType::Text),
    FieldDef::new("amount", FieldType::Integer),
    FieldDef::new("category", FieldType::Integer).nullable(),
    FieldDef::new("active", FieldType::Boolean),
];

/// Spending limit for a period ("day", "week", "month")
///
/// A budget without a category applies to all spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub pk: Option<Pk>,
    pub period: String,
    pub amount: i64,
    pub category: Option<Pk>,
    pub active: bool,
}

impl Budget {
    pub fn new(period: impl Into<String>, amount: i64) -> Self {
        Self {
            pk: None,
            period: period.into(),
            amount,
            category: None,
            active: true,
        }
    }

    pub fn for_category(mut self, category: Pk) -> Self {
        self.category = Some(category);
        self
    }
}

impl Entity for Budget {
    const NAME: &'static str = "Budget";

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
        vec![
            self.period.clone().into(),
            self.amount.into(),
            self.category.into(),
            self.active.into(),
        ]
    }

    fn from_record(pk: Pk, mut record: Record) -> Result<Self> {
        Ok(Self {
            pk: Some(pk),
            period: record.take("period")?,
            amount: record.take("amount")?,
            category: record.take("category")?,
            active: record.take("active")?,
        })
    }
}
