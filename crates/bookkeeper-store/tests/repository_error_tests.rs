// Error mapping tests for the SQLite repository
// Each failure must surface as the documented kind and leave the table intact.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use bookkeeper_core::errors::{BookkeeperError, ExError, ExErrorKind, Result};
use bookkeeper_core::model::{Entity, Expense, FieldDef, FieldType, Pk, Record, Value};
use bookkeeper_store::{ConnectionOptions, JournalMode, SqliteRepository};
use chrono::{TimeZone, Utc};
use common::{open_repo, temp_db, Purchase};

/// Entity that may hand the store a null for a NOT NULL column
#[derive(Debug, Clone, PartialEq)]
struct Reading {
    pk: Option<Pk>,
    sensor: Option<String>,
}

const READING_FIELDS: &[FieldDef] = &[FieldDef::new("sensor", FieldType::Text)];

impl Entity for Reading {
    const NAME: &'static str = "Reading";

    fn fields() -> &'static [FieldDef] {
        READING_FIELDS
    }

    fn pk(&self) -> Option<Pk> {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = Some(pk);
    }

    fn values(&self) -> Vec<Value> {
        vec![self.sensor.clone().into()]
    }

    fn from_record(pk: Pk, mut record: Record) -> Result<Self> {
        Ok(Self {
            pk: Some(pk),
            sensor: record.take("sensor")?,
        })
    }
}

/// Entity whose values disagree with its own descriptor
#[derive(Debug, Clone)]
struct Mislabelled {
    pk: Option<Pk>,
}

const MISLABELLED_FIELDS: &[FieldDef] = &[FieldDef::new("amount", FieldType::Integer)];

impl Entity for Mislabelled {
    const NAME: &'static str = "Mislabelled";

    fn fields() -> &'static [FieldDef] {
        MISLABELLED_FIELDS
    }

    fn pk(&self) -> Option<Pk> {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = Some(pk);
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::from("a lot")]
    }

    fn from_record(pk: Pk, _record: Record) -> Result<Self> {
        Ok(Self { pk: Some(pk) })
    }
}

/// Entity with an optional real column
#[derive(Debug, Clone, PartialEq)]
struct Gauge {
    pk: Option<Pk>,
    ratio: Option<f64>,
}

const GAUGE_FIELDS: &[FieldDef] = &[FieldDef::new("ratio", FieldType::Real).nullable()];

impl Entity for Gauge {
    const NAME: &'static str = "Gauge";

    fn fields() -> &'static [FieldDef] {
        GAUGE_FIELDS
    }

    fn pk(&self) -> Option<Pk> {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = Some(pk);
    }

    fn values(&self) -> Vec<Value> {
        vec![self.ratio.into()]
    }

    fn from_record(pk: Pk, mut record: Record) -> Result<Self> {
        Ok(Self {
            pk: Some(pk),
            ratio: record.take("ratio")?,
        })
    }
}

/// Entity declaring the implicit identity column itself
#[derive(Debug)]
struct Shadowing;

const SHADOWING_FIELDS: &[FieldDef] = &[FieldDef::new("pk", FieldType::Integer)];

impl Entity for Shadowing {
    const NAME: &'static str = "Shadowing";

    fn fields() -> &'static [FieldDef] {
        SHADOWING_FIELDS
    }

    fn pk(&self) -> Option<Pk> {
        None
    }

    fn set_pk(&mut self, _pk: Pk) {}

    fn values(&self) -> Vec<Value> {
        vec![Value::Null]
    }

    fn from_record(_pk: Pk, _record: Record) -> Result<Self> {
        Ok(Self)
    }
}

#[test]
fn test_null_in_not_null_column_is_constraint() {
    // Given: An empty table with a NOT NULL column
    let (_dir, repo) = open_repo::<Reading>();

    // When: An entity supplies null for it
    let mut blank = Reading {
        pk: None,
        sensor: None,
    };
    let err = repo.add(&mut blank).unwrap_err();

    // Then: The store rejects the row and nothing is persisted
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert!(matches!(err, BookkeeperError::Constraint { .. }));
    assert_eq!(blank.pk, None);
    assert_eq!(repo.count(None).unwrap(), 0);
}

#[test]
fn test_update_to_null_is_constraint_and_keeps_row() {
    let (_dir, repo) = open_repo::<Reading>();
    let mut reading = Reading {
        pk: None,
        sensor: Some("north".to_string()),
    };
    let pk = repo.add(&mut reading).unwrap();

    reading.sensor = None;
    let err = repo.update(&reading).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(
        repo.get(pk).unwrap().unwrap().sensor.as_deref(),
        Some("north")
    );
}

#[test]
fn test_value_of_wrong_type_is_constraint() {
    let (_dir, repo) = open_repo::<Mislabelled>();

    let err = repo.add(&mut Mislabelled { pk: None }).unwrap_err();

    assert_eq!(
        err,
        BookkeeperError::FieldTypeMismatch {
            table: "mislabelled".to_string(),
            field: "amount".to_string(),
            expected: "integer".to_string(),
            found: "text".to_string(),
        }
    );
    assert_eq!(ExError::from(err).code(), "ERR_CONSTRAINT_VIOLATION");
}

#[test]
fn test_invalid_descriptor_is_schema_error() {
    let (_dir, path) = temp_db();

    let err = SqliteRepository::<Shadowing>::open(&path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Schema);
    assert!(matches!(err, BookkeeperError::InvalidDescriptor { .. }));
}

#[test]
fn test_non_database_file_is_rejected_at_open() {
    let (_dir, path) = temp_db();
    std::fs::write(&path, vec![0x42_u8; 4096]).unwrap();

    let err = SqliteRepository::<Purchase>::open(&path).unwrap_err();

    assert!(
        matches!(err.kind(), ExErrorKind::Schema | ExErrorKind::Persistence),
        "unexpected kind {:?}",
        err.kind()
    );
}

#[test]
fn test_missing_directory_is_persistence_error() {
    let (dir, _) = temp_db();
    let path = dir.path().join("no").join("such").join("dir.db");

    let err = SqliteRepository::<Purchase>::open(&path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
}

#[test]
fn test_text_in_integer_column_fails_hydration() {
    // Given: A row written by another program that ignored the column type
    let (_dir, path) = temp_db();
    let repo = SqliteRepository::<Purchase>::open(&path).unwrap();
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO purchase (name, amount) VALUES ('milk', 'two')",
        [],
    )
    .unwrap();
    let pk = conn.last_insert_rowid();
    drop(conn);

    // When / Then: Reading it names the offending field
    let err = repo.get(pk).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Serialization);
    assert!(matches!(err, BookkeeperError::Hydration { ref field, .. } if field == "amount"));
}

#[test]
fn test_update_without_pk_reports_not_found_kind() {
    let (_dir, repo) = open_repo::<Purchase>();

    let err = repo.update(&Purchase::new("milk", 2)).unwrap_err();

    assert_eq!(
        err,
        BookkeeperError::MissingPk {
            table: "purchase".to_string()
        }
    );
    assert_eq!(ExError::from(err).code(), "ERR_NOT_FOUND");
}

#[test]
fn test_expense_timestamps_survive_storage() {
    let (_dir, repo) = open_repo::<Expense>();
    let bought = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap();
    let mut expense = Expense::new(1250, 1)
        .with_comment("groceries")
        .with_expense_date(bought);

    let pk = repo.add(&mut expense).unwrap();
    let stored = repo.get(pk).unwrap().unwrap();

    assert_eq!(stored.expense_date, bought);
    assert_eq!(stored.added_date, expense.added_date);
    assert_eq!(stored, expense);
}

#[test]
fn test_wal_journal_mode_round_trip() {
    let (_dir, path) = temp_db();
    let options = ConnectionOptions::default().with_journal_mode(JournalMode::Wal);
    let repo = SqliteRepository::<Purchase>::open_with(&path, options).unwrap();

    let mut milk = Purchase::new("milk", 2);
    let pk = repo.add(&mut milk).unwrap();

    assert_eq!(repo.get(pk).unwrap(), Some(milk));
}

#[test]
fn test_timestamp_beyond_year_9999_rejected_before_write() {
    // Given: A table holding one readable expense
    let (_dir, repo) = open_repo::<Expense>();
    let mut ok = Expense::new(100, 1);
    repo.add(&mut ok).unwrap();

    // When: An expense dated after 9999-12-31 is added
    let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
    let mut future = Expense::new(1, 1).with_expense_date(far);
    let err = repo.add(&mut future).unwrap_err();

    // Then: It is refused as a constraint violation and the table stays readable
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert!(
        matches!(err, BookkeeperError::FieldTypeMismatch { ref field, ref found, .. }
            if field == "expense_date" && found.contains("year 10000")),
        "{:?}",
        err
    );
    assert_eq!(future.pk, None);
    assert_eq!(repo.get_all(None).unwrap(), vec![ok.clone()]);

    // Updating an existing row to such a date is refused the same way
    let mut moved = ok.clone();
    moved.expense_date = far;
    assert_eq!(
        repo.update(&moved).unwrap_err().kind(),
        ExErrorKind::ConstraintViolation
    );
    assert_eq!(repo.get(ok.pk.unwrap()).unwrap(), Some(ok));
}

#[test]
fn test_non_finite_real_rejected_on_nullable_column() {
    let (_dir, repo) = open_repo::<Gauge>();

    for ratio in [f64::NAN, f64::INFINITY] {
        let mut gauge = Gauge {
            pk: None,
            ratio: Some(ratio),
        };
        let err = repo.add(&mut gauge).unwrap_err();
        assert!(matches!(err, BookkeeperError::FieldTypeMismatch { .. }), "{:?}", err);
    }
    assert_eq!(repo.count(None).unwrap(), 0);

    // Finite values and an explicit null still round trip
    let mut half = Gauge {
        pk: None,
        ratio: Some(0.5),
    };
    let mut unset = Gauge {
        pk: None,
        ratio: None,
    };
    let half_pk = repo.add(&mut half).unwrap();
    let unset_pk = repo.add(&mut unset).unwrap();
    assert_eq!(repo.get(half_pk).unwrap(), Some(half));
    assert_eq!(repo.get(unset_pk).unwrap(), Some(unset));
}
