use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Pk};
use super::field::{FieldDef, FieldType};
use super::record::Record;
use super::value::Value;
use crate::errors::Result;

const FIELDS: &[FieldDef] = &[
    FieldDef::new("amount", FieldType::Integer),
    FieldDef::new("category", FieldType::Integer),
    FieldDef::new("expense_date", FieldType::Timestamp),
    FieldDef::new("added_date", FieldType::Timestamp),
    FieldDef::new("comment", FieldType::Text),
];

/// A single purchase
///
/// `amount` is in minor currency units. `category` holds the pk of a
/// [`Category`](super::Category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub pk: Option<Pk>,
    pub amount: i64,
    pub category: Pk,
    pub expense_date: DateTime<Utc>,
    pub added_date: DateTime<Utc>,
    pub comment: String,
}

impl Expense {
    /// Create an expense dated now
    pub fn new(amount: i64, category: Pk) -> Self {
        let now = Utc::now();
        Self {
            pk: None,
            amount,
            category,
            expense_date: now,
            added_date: now,
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_expense_date(mut self, expense_date: DateTime<Utc>) -> Self {
        self.expense_date = expense_date;
        self
    }
}

impl Entity for Expense {
    const NAME: &'static str = "Expense";

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
            self.amount.into(),
            self.category.into(),
            self.expense_date.into(),
            self.added_date.into(),
            self.comment.clone().into(),
        ]
    }

    fn from_record(pk: Pk, mut record: Record) -> Result<Self> {
        Ok(Self {
            pk: Some(pk),
            amount: record.take("amount")?,
            category: record.take("category")?,
            expense_date: record.take("expense_date")?,
            added_date: record.take("added_date")?,
            comment: record.take("comment")?,
        })
    }
}
