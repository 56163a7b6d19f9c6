//! Mapping manager: owns the engine connection and routes records to their tables.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::config::OrmConfig;
use crate::engine::{Engine, RawRow, SqliteEngine};
use crate::error::OrmError;
use crate::table::{Record, TableBinding};

/// Owns one engine connection and one table binding per record type.
///
/// The manager is `Open` from construction until [`MappingManager::close`];
/// every operation after that fails with `OrmError::ManagerClosed`. All
/// engine access goes through a single lock, so the manager can be shared
/// between threads even though the engine cannot run statements
/// concurrently.
pub struct MappingManager {
    /// Path the engine was opened with, for error context
    path: PathBuf,
    /// Record type name to binding
    bindings: HashMap<String, TableBinding>,
    /// Engine handle, `None` once closed
    engine: Mutex<Option<Box<dyn Engine>>>,
}

impl std::fmt::Debug for MappingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingManager")
            .field("path", &self.path)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("open", &self.is_open())
            .finish()
    }
}

impl MappingManager {
    /// Opens a SQLite database and creates the bound tables.
    ///
    /// # Arguments
    /// * `config` - Database path and connection options
    /// * `bindings` - One binding per record type
    ///
    /// # Returns
    /// The open manager, or the first error hit. The connection is released
    /// before any error is returned.
    pub fn open(config: &OrmConfig, bindings: Vec<TableBinding>) -> Result<Self, OrmError> {
        let path = config.database_path.clone();
        let connection_error = |source| OrmError::Connection {
            path: path.clone(),
            source,
        };

        let mut engine = SqliteEngine::open(&path).map_err(connection_error)?;
        if config.enforce_foreign_keys {
            if let Err(e) = engine.set_foreign_keys(true) {
                Self::release(Box::new(engine), &path);
                return Err(connection_error(e));
            }
        }

        Self::with_engine_at(Box::new(engine), path, bindings)
    }

    /// Creates the bound tables on an already opened engine.
    ///
    /// On failure the engine is closed before the error is returned.
    pub fn with_engine(
        engine: Box<dyn Engine>,
        bindings: Vec<TableBinding>,
    ) -> Result<Self, OrmError> {
        Self::with_engine_at(engine, PathBuf::new(), bindings)
    }

    fn with_engine_at(
        mut engine: Box<dyn Engine>,
        path: PathBuf,
        bindings: Vec<TableBinding>,
    ) -> Result<Self, OrmError> {
        match Self::init_tables(engine.as_mut(), &path, bindings) {
            Ok(bindings) => {
                tracing::info!(
                    "Opened mapping manager at {} with {} tables",
                    path.display(),
                    bindings.len()
                );
                Ok(Self {
                    path,
                    bindings,
                    engine: Mutex::new(Some(engine)),
                })
            }
            Err(e) => {
                Self::release(engine, &path);
                Err(e)
            }
        }
    }

    /// Registers bindings and issues their `CREATE TABLE IF NOT EXISTS`, committing after each.
    fn init_tables(
        engine: &mut dyn Engine,
        path: &std::path::Path,
        bindings: Vec<TableBinding>,
    ) -> Result<HashMap<String, TableBinding>, OrmError> {
        let mut registered = HashMap::with_capacity(bindings.len());
        for binding in bindings {
            if registered.contains_key(binding.record_type()) {
                return Err(OrmError::DuplicateBinding(binding.record_type().to_string()));
            }

            let sql = binding.create_statement();
            tracing::info!("Creating table {}", binding.table_name());
            tracing::debug!("Executing on {}: {}", binding.table_name(), sql);
            engine
                .execute(&sql, &[])
                .map_err(|source| OrmError::Engine {
                    table: binding.table_name().to_string(),
                    statement: sql.clone(),
                    source,
                })?;
            engine.commit().map_err(|source| OrmError::Connection {
                path: path.to_path_buf(),
                source,
            })?;

            registered.insert(binding.record_type().to_string(), binding);
        }
        Ok(registered)
    }

    fn release(engine: Box<dyn Engine>, path: &std::path::Path) {
        if let Err(e) = engine.close() {
            tracing::error!("Failed to close database {}: {}", path.display(), e);
        }
    }

    pub fn is_open(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// Binding registered for `record_type`.
    pub fn binding(&self, record_type: &str) -> Result<&TableBinding, OrmError> {
        self.bindings
            .get(record_type)
            .ok_or_else(|| OrmError::UnknownRecordType(record_type.to_string()))
    }

    /// Inserts records, primary keys excluded, committing after each one.
    ///
    /// # Returns
    /// Total number of affected rows.
    pub fn insert(&self, records: &[Record]) -> Result<usize, OrmError> {
        self.insert_records(records, false)
    }

    /// Inserts records including their primary key values.
    pub fn insert_with_primary_key(&self, records: &[Record]) -> Result<usize, OrmError> {
        self.insert_records(records, true)
    }

    fn insert_records(&self, records: &[Record], include_primary_key: bool) -> Result<usize, OrmError> {
        let mut guard = self.engine.lock();
        let engine = guard.as_mut().ok_or(OrmError::ManagerClosed)?;

        let mut affected = 0;
        for record in records {
            let binding = self.binding(record.record_type())?;
            let insert = binding.insert_statement(record, include_primary_key)?;
            tracing::debug!("Executing on {}: {}", binding.table_name(), insert.sql);

            let engine_error = |source| OrmError::Engine {
                table: binding.table_name().to_string(),
                statement: insert.sql.clone(),
                source,
            };
            affected += engine
                .execute(&insert.sql, &insert.params)
                .map_err(engine_error)?;
            engine.commit().map_err(engine_error)?;
        }
        Ok(affected)
    }

    /// Reads every row of the table bound to `record_type`.
    ///
    /// The query runs immediately; rows are converted to records as the
    /// returned iterator is consumed. Calling `select` again re-runs the query.
    pub fn select(&self, record_type: &str) -> Result<Records, OrmError> {
        let mut guard = self.engine.lock();
        let engine = guard.as_mut().ok_or(OrmError::ManagerClosed)?;
        let binding = self.binding(record_type)?;

        let sql = binding.select_statement();
        tracing::debug!("Executing on {}: {}", binding.table_name(), sql);
        let rows = engine.query(&sql, &[]).map_err(|source| OrmError::Engine {
            table: binding.table_name().to_string(),
            statement: sql.clone(),
            source,
        })?;

        Ok(Records {
            binding: binding.clone(),
            rows: rows.into_iter(),
        })
    }

    /// Commits pending work and releases the connection.
    ///
    /// # Returns
    /// `Err(OrmError::ManagerClosed)` if already closed. The connection is
    /// released even if the final commit fails.
    pub fn close(&self) -> Result<(), OrmError> {
        let mut engine = self.engine.lock().take().ok_or(OrmError::ManagerClosed)?;
        tracing::info!("Closing database {}", self.path.display());

        let committed = engine.commit();
        let closed = engine.close();
        committed
            .and(closed)
            .map_err(|source| OrmError::Connection {
                path: self.path.clone(),
                source,
            })
    }
}

impl Drop for MappingManager {
    fn drop(&mut self) {
        if let Some(mut engine) = self.engine.get_mut().take() {
            if let Err(e) = engine.commit() {
                tracing::error!("Failed to commit database {}: {}", self.path.display(), e);
            }
            Self::release(engine, &self.path);
        }
    }
}

/// Records produced by [`MappingManager::select`], converted on demand.
#[derive(Debug)]
pub struct Records {
    binding: TableBinding,
    rows: std::vec::IntoIter<RawRow>,
}

impl Iterator for Records {
    type Item = Result<Record, OrmError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| self.binding.row_to_record(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Records {}
