//! Unified error types for the catalog.
//!
//! The first four variants form the user-correctable taxonomy surfaced to API
//! callers; the rest are infrastructure failures.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The entity addressed by a read or update does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"product"`
        entity: &'static str,
        /// Requested id
        id: i64,
    },

    /// A foreign-key id supplied by the caller does not resolve.
    #[error("{entity} {id} does not exist")]
    ReferenceNotFound {
        /// Referenced entity kind, e.g. `"product_type"`
        entity: &'static str,
        /// Supplied id
        id: i64,
    },

    /// A unique field collides with an existing row.
    #[error("{entity} with {field} '{value}' already exists")]
    UniquenessViolation {
        /// Entity kind
        entity: &'static str,
        /// Colliding field
        field: &'static str,
        /// Colliding value
        value: String,
    },

    /// A value is outside its allowed range.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong
        message: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Source spreadsheet data could not be normalized.
    #[error("Import error: {message}")]
    Import {
        /// What was wrong, including the offending row
        message: String,
    },

    /// Database failure not covered by the taxonomy above.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required environment variable missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether the caller can fix this error by changing its input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::ReferenceNotFound { .. }
                | Self::UniquenessViolation { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Translates constraint violations reported by the database into the taxonomy.
    ///
    /// The service layer checks uniqueness and references before writing, so this
    /// only fires when a concurrent writer wins the race between check and write.
    pub(crate) fn from_write(err: DbErr, target: &WriteTarget<'_>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                let hit = target
                    .unique
                    .iter()
                    .find(|(field, _)| mentions_column(&detail, field))
                    .or_else(|| target.unique.first());
                match hit {
                    Some(&(field, value)) => Self::UniquenessViolation {
                        entity: target.entity,
                        field,
                        value: value.to_string(),
                    },
                    None => Self::Database(err),
                }
            }
            // SQLite does not name the failing key, so the first reference is reported
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => match target.references.first() {
                Some(&(entity, id)) => Self::ReferenceNotFound { entity, id },
                None => Self::Database(err),
            },
            _ => Self::Database(err),
        }
    }
}

/// The row a write was about, for translating constraint errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WriteTarget<'a> {
    /// Entity being written
    pub entity: &'static str,
    /// Unique columns with the values being written
    pub unique: &'a [(&'static str, &'a str)],
    /// Referenced entities with the ids being written, most likely to fail first
    pub references: &'a [(&'static str, i64)],
}

/// Whether a constraint message such as `UNIQUE constraint failed: products.article`
/// names `column`.
fn mentions_column(detail: &str, column: &str) -> bool {
    detail
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word == column)
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
