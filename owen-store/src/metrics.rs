//! Initiative metric calculation seam
//!
//! Metric scores come from an external analytics component. The store only
//! asks for them and persists what it gets back.

use async_trait::async_trait;

use owen_core::{Audience, InitiativeId, Metric, TenantId};

use crate::error::DbResult;

#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn metrics(
        &self,
        tenant: TenantId,
        initiative_id: InitiativeId,
        audience: &Audience,
    ) -> DbResult<Vec<Metric>>;
}

/// Used when no calculator is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetrics;

#[async_trait]
impl MetricSource for NoMetrics {
    async fn metrics(
        &self,
        _tenant: TenantId,
        _initiative_id: InitiativeId,
        _audience: &Audience,
    ) -> DbResult<Vec<Metric>> {
        Ok(Vec::new())
    }
}
