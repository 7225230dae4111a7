//! SQLite repository implementation
//!
//! One repository per (database file, entity type). Opening it derives the
//! table from the entity's descriptor and creates the table if absent; every
//! call afterwards opens its own connection and drops it before returning.

#![allow(clippy::result_large_err)]

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bookkeeper_core::errors::BookkeeperError;
use bookkeeper_core::model::{coerce_values, Entity, FieldDef, Pk, Value};
use bookkeeper_core::repository::{Filter, Repository};
use bookkeeper_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Statement};

use super::hydration::{read_record, to_sql};
use super::schema::TableSchema;
use crate::db::{self, ConnectionOptions};
use crate::errors::{constraint, query, schema, Result};

/// SQLite-backed repository for entities of type `T`
///
/// The location must be a file path. Each call uses a fresh connection, so an
/// in-memory database would not survive from one call to the next.
#[derive(Debug)]
pub struct SqliteRepository<T> {
    location: PathBuf,
    options: ConnectionOptions,
    schema: TableSchema,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteRepository<T> {
    /// Open with default connection options
    ///
    /// # Errors
    ///
    /// Returns a schema error if the descriptor is invalid or the store
    /// rejects `CREATE TABLE`, and a persistence error if the file cannot be
    /// opened.
    pub fn open(location: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(location, ConnectionOptions::default())
    }

    /// Open with explicit connection options
    ///
    /// An existing table is left untouched. Its columns are not compared
    /// with the descriptor.
    pub fn open_with(location: impl AsRef<Path>, options: ConnectionOptions) -> Result<Self> {
        let table = T::table_name();
        observed("repo_open", &table, || {
            let repo = Self {
                location: location.as_ref().to_path_buf(),
                options,
                schema: TableSchema::derive::<T>()?,
                _entity: PhantomData,
            };

            let conn = repo.connect()?;
            conn.execute(repo.schema.create_sql(), [])
                .map_err(|e| schema(repo.table_name(), e))?;

            Ok(repo)
        })
    }

    pub fn table_name(&self) -> &str {
        self.schema.table()
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.schema.fields()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn connect(&self) -> Result<Connection> {
        db::open(&self.location, &self.options)
    }

    /// Insert `entity` and write the assigned pk into it
    ///
    /// Any pk already on the entity is ignored.
    pub fn add(&self, entity: &mut T) -> Result<Pk> {
        let table = self.table_name();
        observed("repo_add", table, || {
            let values = coerce_values(table, self.fields(), entity.values())?;

            let conn = self.connect()?;
            conn.execute(self.schema.insert_sql(), params_from_iter(values.iter().map(to_sql)))
                .map_err(|e| constraint(table, e))?;

            let pk = conn.last_insert_rowid();
            entity.set_pk(pk);
            Ok(pk)
        })
    }

    /// Fetch by pk; `Ok(None)` when no row matches
    pub fn get(&self, pk: Pk) -> Result<Option<T>> {
        let table = self.table_name();
        observed("repo_get", table, || {
            let conn = self.connect()?;
            let mut stmt = conn
                .prepare(self.schema.select_by_pk_sql())
                .map_err(|e| query(table, e))?;

            let mut found = self.hydrate(&mut stmt, vec![SqlValue::Integer(pk)])?;
            Ok(found.pop())
        })
    }

    /// Fetch every entity matching all conditions of `filter`
    ///
    /// No ordering is requested, so rows come back in whatever order SQLite
    /// scans them.
    pub fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>> {
        let table = self.table_name();
        observed("repo_get_all", table, || {
            let conditions = self.resolve(filter)?;
            let sql = self.schema.select_sql(&conditions);

            let conn = self.connect()?;
            let mut stmt = conn.prepare(&sql).map_err(|e| query(table, e))?;
            self.hydrate(&mut stmt, bind_conditions(&conditions))
        })
    }

    /// Number of rows matching all conditions of `filter`
    pub fn count(&self, filter: Option<&Filter>) -> Result<u64> {
        let table = self.table_name();
        observed("repo_count", table, || {
            let conditions = self.resolve(filter)?;
            let sql = self.schema.count_sql(&conditions);

            let conn = self.connect()?;
            let n: i64 = conn
                .query_row(&sql, params_from_iter(bind_conditions(&conditions)), |row| {
                    row.get(0)
                })
                .map_err(|e| query(table, e))?;
            Ok(n.max(0) as u64)
        })
    }

    /// Overwrite every declared field of the stored row
    ///
    /// The existence check and the write share one connection but no
    /// transaction. A row deleted by someone else in between leaves the
    /// update affecting nothing; that is logged, not reported.
    pub fn update(&self, entity: &T) -> Result<()> {
        let table = self.table_name();
        observed("repo_update", table, || {
            let pk = entity.pk().ok_or_else(|| BookkeeperError::MissingPk {
                table: table.to_string(),
            })?;
            let values = coerce_values(table, self.fields(), entity.values())?;

            let conn = self.connect()?;
            self.ensure_exists(&conn, pk)?;

            let mut params: Vec<SqlValue> = values.iter().map(to_sql).collect();
            params.push(SqlValue::Integer(pk));
            let affected = conn
                .execute(self.schema.update_sql(), params_from_iter(params))
                .map_err(|e| constraint(table, e))?;
            if affected == 0 {
                tracing::warn!(table, pk, "row removed between existence check and update");
            }
            Ok(())
        })
    }

    /// Remove the row with `pk`
    pub fn delete(&self, pk: Pk) -> Result<()> {
        let table = self.table_name();
        observed("repo_delete", table, || {
            let conn = self.connect()?;
            self.ensure_exists(&conn, pk)?;

            let affected = conn
                .execute(self.schema.delete_sql(), [pk])
                .map_err(|e| constraint(table, e))?;
            if affected == 0 {
                tracing::warn!(table, pk, "row removed between existence check and delete");
            }
            Ok(())
        })
    }

    /// Remove every row, keeping the table
    pub fn delete_all(&self) -> Result<()> {
        let table = self.table_name();
        observed("repo_delete_all", table, || {
            let conn = self.connect()?;
            let removed = conn
                .execute(self.schema.delete_all_sql(), [])
                .map_err(|e| constraint(table, e))?;
            tracing::debug!(table, row_count = removed, "table cleared");
            Ok(())
        })
    }

    fn resolve(&self, filter: Option<&Filter>) -> Result<Vec<(&'static FieldDef, Value)>> {
        match filter {
            Some(filter) => filter.resolve(self.table_name(), self.fields()),
            None => Ok(Vec::new()),
        }
    }

    fn ensure_exists(&self, conn: &Connection, pk: Pk) -> Result<()> {
        let table = self.table_name();
        let found = conn
            .query_row(self.schema.exists_sql(), [pk], |_| Ok(()))
            .optional()
            .map_err(|e| query(table, e))?;

        found.ok_or_else(|| BookkeeperError::NotFound {
            table: table.to_string(),
            pk,
        })
    }

    fn hydrate(&self, stmt: &mut Statement<'_>, params: Vec<SqlValue>) -> Result<Vec<T>> {
        let table = self.table_name();
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(|e| query(table, e))?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next().map_err(|e| query(table, e))? {
            let (pk, record) = read_record(table, self.fields(), &columns, row)?;
            entities.push(T::from_record(pk, record)?);
        }
        Ok(entities)
    }
}

fn bind_conditions(conditions: &[(&FieldDef, Value)]) -> Vec<SqlValue> {
    conditions.iter().map(|(_, value)| to_sql(value)).collect()
}

/// Run `f` as a logged operation boundary on `table`
fn observed<R>(op: &'static str, table: &str, f: impl FnOnce() -> Result<R>) -> Result<R> {
    log_op_start!(op, table = table);
    let start = Instant::now();

    let result = f();
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, table = table);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms, table = table);
        }
    }
    result
}

impl<T: Entity> Repository<T> for SqliteRepository<T> {
    fn add(&self, entity: &mut T) -> Result<Pk> {
        SqliteRepository::add(self, entity)
    }

    fn get(&self, pk: Pk) -> Result<Option<T>> {
        SqliteRepository::get(self, pk)
    }

    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>> {
        SqliteRepository::get_all(self, filter)
    }

    fn update(&self, entity: &T) -> Result<()> {
        SqliteRepository::update(self, entity)
    }

    fn delete(&self, pk: Pk) -> Result<()> {
        SqliteRepository::delete(self, pk)
    }

    fn delete_all(&self) -> Result<()> {
        SqliteRepository::delete_all(self)
    }
}
