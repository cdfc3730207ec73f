//! Relational layer - connection pools and the stored-procedure seam
//!
//! # Design Principles
//!
//! - One pool per tenant, owned by the tenant registry
//! - Every call goes through a named stored procedure, never ad hoc SQL
//! - Arguments are always bound, never spliced into the statement

pub mod pool;
pub mod procedures;

pub use pool::{create_pool, create_pool_with_options};
pub use procedures::{
    call_sql, first_flag, PgProcedures, ProcArg, ProcParam, ProcRow, ProcValue, Procedure,
    ProcedureCaller,
};
