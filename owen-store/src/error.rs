//! Error types for owen-store

use owen_core::{OwenError, TenantId};
use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("graph error: {0}")]
    Graph(#[from] neo4rs::Error),

    #[error("graph row error: {0}")]
    GraphRow(#[from] neo4rs::DeError),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("no configuration for tenant {0}")]
    UnknownTenant(TenantId),

    #[error("procedure {procedure} failed: {reason}")]
    Procedure {
        procedure: &'static str,
        reason: String,
    },

    #[error("column '{column}': {reason}")]
    Column { column: String, reason: String },

    #[error("graph store: {0}")]
    GraphState(String),

    #[error(transparent)]
    Core(#[from] OwenError),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn column(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Column {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
