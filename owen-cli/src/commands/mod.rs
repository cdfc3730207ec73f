//! Command implementations for owenctl

pub mod employee;
pub mod initiative;

pub use employee::run_employee;
pub use initiative::run_initiative;

use anyhow::Result;
use owen_core::OwenConfig;
use owen_store::TenantRegistry;
use tracing::debug;

/// Load the config file and build a registry over live connections.
pub(crate) fn open_registry() -> Result<(OwenConfig, TenantRegistry)> {
    let config = OwenConfig::load()?;
    let registry = TenantRegistry::from_config(&config);
    debug!(tenants = config.tenants.len(), "tenant registry ready");
    Ok((config, registry))
}
