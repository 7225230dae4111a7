//! In-memory repository
//!
//! Same semantics as the SQLite repository, kept in a process-local map.
//! Useful for tests of code that only needs the [`Repository`] contract.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{BookkeeperError, Result};
use crate::model::{coerce_values, Entity, Pk};
use crate::repository::{Filter, Repository};

#[derive(Debug)]
struct MemoryState<T> {
    rows: BTreeMap<Pk, T>,
    last_pk: Pk,
}

/// Map-backed repository; pks are assigned from 1 upwards and never reused
#[derive(Debug)]
pub struct MemoryRepository<T> {
    table: String,
    state: Mutex<MemoryState<T>>,
}

impl<T: Entity + Clone> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            table: T::table_name(),
            state: Mutex::new(MemoryState {
                rows: BTreeMap::new(),
                last_pk: 0,
            }),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.rows.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState<T>>> {
        self.state.lock().map_err(|_| BookkeeperError::Internal {
            message: format!("memory repository for {} is poisoned", self.table),
        })
    }

    /// Mirror the store's NOT NULL and type checks
    fn check(&self, entity: &T) -> Result<()> {
        let values = coerce_values(&self.table, T::fields(), entity.values())?;
        for (field, value) in T::fields().iter().zip(&values) {
            if value.is_null() && !field.nullable {
                return Err(BookkeeperError::Constraint {
                    table: self.table.clone(),
                    message: format!("NOT NULL constraint failed: {}.{}", self.table, field.name),
                });
            }
        }
        Ok(())
    }
}

impl<T: Entity + Clone> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + Clone> Repository<T> for MemoryRepository<T> {
    fn add(&self, entity: &mut T) -> Result<Pk> {
        self.check(entity)?;

        let mut state = self.lock()?;
        let pk = state.last_pk + 1;
        state.last_pk = pk;

        entity.set_pk(pk);
        state.rows.insert(pk, entity.clone());
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> Result<Option<T>> {
        Ok(self.lock()?.rows.get(&pk).cloned())
    }

    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<T>> {
        let conditions = match filter {
            Some(filter) => filter.resolve(&self.table, T::fields())?,
            None => Vec::new(),
        };

        let state = self.lock()?;
        let mut matched = Vec::new();
        for row in state.rows.values() {
            let values = coerce_values(&self.table, T::fields(), row.values())?;
            let keep = conditions.iter().all(|(field, expected)| {
                T::fields()
                    .iter()
                    .position(|f| f.name == field.name)
                    .map(|i| &values[i] == expected)
                    .unwrap_or(false)
            });
            if keep {
                matched.push(row.clone());
            }
        }
        Ok(matched)
    }

    fn update(&self, entity: &T) -> Result<()> {
        let pk = entity.pk().ok_or_else(|| BookkeeperError::MissingPk {
            table: self.table.clone(),
        })?;
        self.check(entity)?;

        let mut state = self.lock()?;
        match state.rows.get_mut(&pk) {
            Some(row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(BookkeeperError::NotFound {
                table: self.table.clone(),
                pk,
            }),
        }
    }

    fn delete(&self, pk: Pk) -> Result<()> {
        self.lock()?
            .rows
            .remove(&pk)
            .map(|_| ())
            .ok_or_else(|| BookkeeperError::NotFound {
                table: self.table.clone(),
                pk,
            })
    }

    fn delete_all(&self) -> Result<()> {
        self.lock()?.rows.clear();
        Ok(())
    }
}
