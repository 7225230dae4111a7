use bookkeeper_core::errors::Result;
use bookkeeper_core::model::{Entity, FieldDef, FieldType, Pk, Record, Value};
use bookkeeper_store::SqliteRepository;
use std::path::PathBuf;
use tempfile::TempDir;

/// Minimal two-field entity: `name` then `amount`
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub pk: Option<Pk>,
    pub name: String,
    pub amount: i64,
}

impl Purchase {
    #[allow(dead_code)]
    pub fn new(name: &str, amount: i64) -> Self {
        Self {
            pk: None,
            name: name.to_string(),
            amount,
        }
    }
}

const PURCHASE_FIELDS: &[FieldDef] = &[
    FieldDef::new("name", FieldType::Text),
    FieldDef::new("amount", FieldType::Integer),
];

impl Entity for Purchase {
    const NAME: &'static str = "Purchase";

    fn fields() -> &'static [FieldDef] {
        PURCHASE_FIELDS
    }

    fn pk(&self) -> Option<Pk> {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = Some(pk);
    }

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.amount.into()]
    }

    fn from_record(pk: Pk, mut record: Record) -> Result<Self> {
        Ok(Self {
            pk: Some(pk),
            name: record.take("name")?,
            amount: record.take("amount")?,
        })
    }
}

/// Fresh database file in its own temp directory
///
/// Keep the returned `TempDir` alive for as long as the path is used.
#[allow(dead_code)]
pub fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookkeeper.db");
    (dir, path)
}

#[allow(dead_code)]
pub fn open_repo<T: Entity>() -> (TempDir, SqliteRepository<T>) {
    let (dir, path) = temp_db();
    let repo = SqliteRepository::open(&path).unwrap();
    (dir, repo)
}

/// Sort by pk; listing order is up to the store
#[allow(dead_code)]
pub fn by_pk<T: Entity>(mut entities: Vec<T>) -> Vec<T> {
    entities.sort_by_key(|e| e.pk());
    entities
}
