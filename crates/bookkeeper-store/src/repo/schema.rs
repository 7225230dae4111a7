//! Table schema derivation
//!
//! Turns an entity's field descriptor into a table definition and the full
//! set of statement templates, once, when the repository is opened. Only
//! identifiers from the validated descriptor are ever spliced into SQL;
//! values always go through positional parameters.

use bookkeeper_core::errors::BookkeeperError;
use bookkeeper_core::model::{Entity, FieldDef, Value};

use crate::errors::Result;

/// Name of the identity column
pub const PK_COLUMN: &str = "pk";

/// Derived table definition plus cached statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
    fields: &'static [FieldDef],
    create_sql: String,
    insert_sql: String,
    select_sql: String,
    select_by_pk_sql: String,
    exists_sql: String,
    update_sql: String,
    delete_sql: String,
    delete_all_sql: String,
    count_sql: String,
}

impl TableSchema {
    /// Derive the schema of `T`'s table
    pub fn derive<T: Entity>() -> Result<Self> {
        Self::from_parts(T::table_name(), T::fields())
    }

    /// Build a schema from a table name and descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if the table or a field name is not a plain
    /// identifier, a field name repeats or shadows `pk`, or there are no fields.
    pub fn from_parts(table: impl Into<String>, fields: &'static [FieldDef]) -> Result<Self> {
        let table = table.into();
        validate(&table, fields)?;

        let quoted_table = quote(&table);
        let column_defs = fields
            .iter()
            .map(|f| {
                let null = if f.nullable { "" } else { " NOT NULL" };
                format!("{} {}{}", quote(f.name), f.ty.sql_type(), null)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let names = fields
            .iter()
            .map(|f| quote(f.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=fields.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} = ?{}", quote(f.name), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let pk = quote(PK_COLUMN);

        Ok(Self {
            create_sql: format!(
                "CREATE TABLE IF NOT EXISTS {} ({} INTEGER PRIMARY KEY, {})",
                quoted_table, pk, column_defs
            ),
            insert_sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quoted_table, names, placeholders
            ),
            select_sql: format!("SELECT {}, {} FROM {}", pk, names, quoted_table),
            select_by_pk_sql: format!(
                "SELECT {}, {} FROM {} WHERE {} = ?1",
                pk, names, quoted_table, pk
            ),
            exists_sql: format!("SELECT 1 FROM {} WHERE {} = ?1", quoted_table, pk),
            update_sql: format!(
                "UPDATE {} SET {} WHERE {} = ?{}",
                quoted_table,
                assignments,
                pk,
                fields.len() + 1
            ),
            delete_sql: format!("DELETE FROM {} WHERE {} = ?1", quoted_table, pk),
            delete_all_sql: format!("DELETE FROM {}", quoted_table),
            count_sql: format!("SELECT COUNT(*) FROM {}", quoted_table),
            table,
            fields,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn create_sql(&self) -> &str {
        &self.create_sql
    }

    /// Insert binding every field in descriptor order as `?1..?N`
    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }

    pub fn select_by_pk_sql(&self) -> &str {
        &self.select_by_pk_sql
    }

    pub fn exists_sql(&self) -> &str {
        &self.exists_sql
    }

    /// Update binding fields as `?1..?N` and the pk as `?N+1`
    pub fn update_sql(&self) -> &str {
        &self.update_sql
    }

    pub fn delete_sql(&self) -> &str {
        &self.delete_sql
    }

    pub fn delete_all_sql(&self) -> &str {
        &self.delete_all_sql
    }

    /// Select with one `IS ?n` condition per resolved filter entry
    ///
    /// `IS` is SQLite's null-safe equality, so a `Null` condition matches
    /// NULL columns instead of nothing.
    pub fn select_sql(&self, conditions: &[(&FieldDef, Value)]) -> String {
        with_where(&self.select_sql, conditions)
    }

    pub fn count_sql(&self, conditions: &[(&FieldDef, Value)]) -> String {
        with_where(&self.count_sql, conditions)
    }
}

fn with_where(base: &str, conditions: &[(&FieldDef, Value)]) -> String {
    if conditions.is_empty() {
        return base.to_string();
    }
    let clause = conditions
        .iter()
        .enumerate()
        .map(|(i, (field, _))| format!("{} IS ?{}", quote(field.name), i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!("{} WHERE {}", base, clause)
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

/// ASCII letter or underscore, then letters, digits or underscores
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate(table: &str, fields: &[FieldDef]) -> Result<()> {
    let invalid = |reason: String| BookkeeperError::InvalidDescriptor {
        table: table.to_string(),
        reason,
    };

    if !is_identifier(table) {
        return Err(invalid(format!("table name {:?} is not an identifier", table)));
    }
    if table.starts_with("sqlite_") {
        return Err(invalid("table names starting with sqlite_ are reserved".to_string()));
    }
    if fields.is_empty() {
        return Err(invalid("descriptor declares no fields".to_string()));
    }

    for (i, field) in fields.iter().enumerate() {
        if !is_identifier(field.name) {
            return Err(invalid(format!(
                "field name {:?} is not an identifier",
                field.name
            )));
        }
        if field.name.eq_ignore_ascii_case(PK_COLUMN) {
            return Err(invalid("pk is implicit and cannot be declared".to_string()));
        }
        // SQLite column names are case-insensitive
        if fields[..i]
            .iter()
            .any(|f| f.name.eq_ignore_ascii_case(field.name))
        {
            return Err(invalid(format!("field {} declared twice", field.name)));
        }
    }
    Ok(())
}
