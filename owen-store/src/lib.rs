//! owen-store: tenant-scoped data access for owen
//!
//! Three repositories sit on two seams per tenant:
//!
//! - [`db::ProcedureCaller`] runs the relational stored procedures
//!   (Postgres through sqlx in production)
//! - [`graph::GraphStore`] runs the initiative graph queries
//!   (Neo4j through neo4rs in production)
//!
//! A [`TenantRegistry`] built from [`owen_core::OwenConfig`] owns the
//! per-tenant connections and is passed by reference to every repository.

pub mod boundary;
pub mod db;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod registry;
pub mod repos;

pub use boundary::Lenient;
pub use error::{DbError, DbResult};
pub use metrics::{MetricSource, NoMetrics};
pub use registry::{LiveConnector, TenantConnector, TenantHandle, TenantRegistry};
pub use repos::{EmployeeRepo, InitiativeRepo, ResponseRecorder};
