use thiserror::Error;

use crate::model::Pk;

/// Result type alias using BookkeeperError
pub type Result<T> = std::result::Result<T, BookkeeperError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Stable classification of every error a repository can raise. Each kind maps
/// to a stable error code usable for programmatic handling and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Table creation or descriptor rejected
    Schema,
    /// Insert/update rejected by a store constraint or by type coercion
    ConstraintViolation,
    /// Malformed filter or generated statement
    Query,
    /// Target identity does not exist
    NotFound,
    /// Stored value could not be turned back into a field value
    Serialization,
    /// Store could not be opened or configured
    Persistence,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Query => "ERR_QUERY",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and the table/pk
/// context of the failing repository call for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    pk: Option<Pk>,
    field: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            pk: None,
            field: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add identity context
    pub fn with_pk(mut self, pk: Pk) -> Self {
        self.pk = Some(pk);
        self
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn pk(&self) -> Option<Pk> {
        self.pk
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(pk) = self.pk {
            write!(f, " (pk: {})", pk)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for repository operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookkeeperError {
    // ===== Schema Errors =====
    /// The store rejected the table definition
    #[error("Schema rejected for table {table}: {message}")]
    Schema { table: String, message: String },

    /// The entity descriptor cannot be turned into a table
    #[error("Invalid descriptor for table {table}: {reason}")]
    InvalidDescriptor { table: String, reason: String },

    // ===== Constraint Errors =====
    /// The store rejected an insert or update
    #[error("Constraint violated on table {table}: {message}")]
    Constraint { table: String, message: String },

    /// A bound value does not match its declared field type
    #[error("Field {field} on table {table} expects {expected}, got {found}")]
    FieldTypeMismatch {
        table: String,
        field: String,
        expected: String,
        found: String,
    },

    // ===== Query Errors =====
    /// The store rejected a generated select
    #[error("Query failed on table {table}: {message}")]
    Query { table: String, message: String },

    /// A filter named a field the entity does not declare
    #[error("Unknown field {field} for table {table}")]
    UnknownField { table: String, field: String },

    // ===== Lookup Errors =====
    /// No row with the given identity
    #[error("No row with pk = {pk} in table {table}")]
    NotFound { table: String, pk: Pk },

    /// Entity has never been persisted, so there is no row to address
    #[error("Entity for table {table} has no pk")]
    MissingPk { table: String },

    // ===== Hydration Errors =====
    /// A stored column could not be turned back into a field value
    #[error("Cannot read field {field} from table {table}: {reason}")]
    Hydration {
        table: String,
        field: String,
        reason: String,
    },

    // ===== Store Errors =====
    /// Storage location could not be opened or configured
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from BookkeeperError to ExError
///
/// Lets the logging macros classify any repository failure by kind and code.
impl From<BookkeeperError> for ExError {
    fn from(err: BookkeeperError) -> Self {
        let message = err.to_string();
        match err {
            BookkeeperError::Schema { table, .. } => ExError::new(ExErrorKind::Schema)
                .with_table(table)
                .with_message(message),

            BookkeeperError::InvalidDescriptor { table, .. } => {
                ExError::new(ExErrorKind::Schema)
                    .with_table(table)
                    .with_op("derive_schema")
                    .with_message(message)
            }

            BookkeeperError::Constraint { table, .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_table(table)
                    .with_message(message)
            }

            BookkeeperError::FieldTypeMismatch { table, field, .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_table(table)
                    .with_field(field)
                    .with_message(message)
            }

            BookkeeperError::Query { table, .. } => ExError::new(ExErrorKind::Query)
                .with_table(table)
                .with_message(message),

            BookkeeperError::UnknownField { table, field } => ExError::new(ExErrorKind::Query)
                .with_table(table)
                .with_field(field)
                .with_message(message),

            BookkeeperError::NotFound { table, pk } => ExError::new(ExErrorKind::NotFound)
                .with_table(table)
                .with_pk(pk)
                .with_message(message),

            BookkeeperError::MissingPk { table } => ExError::new(ExErrorKind::NotFound)
                .with_table(table)
                .with_message(message),

            BookkeeperError::Hydration { table, field, .. } => {
                ExError::new(ExErrorKind::Serialization)
                    .with_table(table)
                    .with_field(field)
                    .with_message(message)
            }

            BookkeeperError::Persistence { .. } => {
                ExError::new(ExErrorKind::Persistence).with_message(message)
            }

            BookkeeperError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl BookkeeperError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }

    /// True for the explicit missing-row precondition failure of update/delete
    pub fn is_not_found(&self) -> bool {
        self.kind() == ExErrorKind::NotFound
    }
}
