//! owen-core: records, rules and configuration shared by the owen data layer
//!
//! Nothing in this crate touches a database. The store crate maps rows into
//! these records and the CLI prints them.

pub mod config;
pub mod dates;
pub mod error;
pub mod model;

pub use config::{Aggregation, OwenConfig, TenantConfig};
pub use error::{OwenError, Result};
pub use model::*;
