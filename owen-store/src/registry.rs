//! Tenant registry - per-company connections, created once and passed around
//!
//! Handles are connected lazily on first use and cached. The cache is bounded
//! by `registry.max_tenants`; past that the least recently used tenant is
//! dropped and its pools close once the last in-flight operation lets go.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use owen_core::{OwenConfig, TenantConfig, TenantId};

use crate::db::{create_pool_with_options, PgProcedures, ProcedureCaller};
use crate::error::{DbError, DbResult};
use crate::graph::{GraphStore, Neo4jGraph};

/// Connections for one tenant
#[derive(Clone)]
pub struct TenantHandle {
    procedures: Arc<dyn ProcedureCaller>,
    graph: Arc<dyn GraphStore>,
}

impl TenantHandle {
    pub fn new(procedures: Arc<dyn ProcedureCaller>, graph: Arc<dyn GraphStore>) -> Self {
        Self { procedures, graph }
    }

    pub fn procedures(&self) -> &dyn ProcedureCaller {
        self.procedures.as_ref()
    }

    pub fn graph(&self) -> &dyn GraphStore {
        self.graph.as_ref()
    }
}

/// Opens the connections described by a tenant's configuration
#[async_trait]
pub trait TenantConnector: Send + Sync {
    async fn connect(&self, config: &TenantConfig) -> DbResult<TenantHandle>;
}

/// Postgres pool plus Neo4j graph
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveConnector;

#[async_trait]
impl TenantConnector for LiveConnector {
    async fn connect(&self, config: &TenantConfig) -> DbResult<TenantHandle> {
        let pool = create_pool_with_options(&config.database_url, config.max_connections).await?;
        let graph =
            Neo4jGraph::connect(&config.graph_uri, &config.graph_user, &config.graph_password)
                .await?;
        info!(tenant = %config.id, "connected tenant stores");
        Ok(TenantHandle::new(
            Arc::new(PgProcedures::new(pool)),
            Arc::new(graph),
        ))
    }
}

#[derive(Default)]
struct Cache {
    handles: HashMap<TenantId, TenantHandle>,
    // front is least recently used
    order: VecDeque<TenantId>,
}

impl Cache {
    fn touch(&mut self, tenant: TenantId) {
        self.order.retain(|t| *t != tenant);
        self.order.push_back(tenant);
    }

    fn remove(&mut self, tenant: TenantId) -> bool {
        self.order.retain(|t| *t != tenant);
        self.handles.remove(&tenant).is_some()
    }
}

pub struct TenantRegistry {
    configs: HashMap<TenantId, TenantConfig>,
    connector: Arc<dyn TenantConnector>,
    max_tenants: usize,
    cache: Mutex<Cache>,
}

impl TenantRegistry {
    /// Registry over live Postgres and Neo4j connections.
    pub fn from_config(config: &OwenConfig) -> Self {
        Self::with_connector(config, Arc::new(LiveConnector))
    }

    pub fn with_connector(config: &OwenConfig, connector: Arc<dyn TenantConnector>) -> Self {
        Self {
            configs: config
                .tenants
                .iter()
                .map(|tenant| (tenant.id, tenant.clone()))
                .collect(),
            connector,
            max_tenants: config.registry.max_tenants.max(1),
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Cached handle for `tenant`, connecting on first use.
    ///
    /// The cache lock is not held while connecting, so a slow tenant does not
    /// stall lookups for the others.
    pub async fn connect(&self, tenant: TenantId) -> DbResult<TenantHandle> {
        {
            let mut cache = self.cache.lock().await;
            if let Some(handle) = cache.handles.get(&tenant).cloned() {
                cache.touch(tenant);
                return Ok(handle);
            }
        }

        let config = self
            .configs
            .get(&tenant)
            .ok_or(DbError::UnknownTenant(tenant))?;
        let handle = self.connector.connect(config).await?;

        let mut cache = self.cache.lock().await;
        // another caller may have connected the same tenant meanwhile
        if let Some(existing) = cache.handles.get(&tenant).cloned() {
            cache.touch(tenant);
            return Ok(existing);
        }

        while cache.handles.len() >= self.max_tenants {
            let Some(oldest) = cache.order.pop_front() else {
                break;
            };
            cache.handles.remove(&oldest);
            debug!(tenant = %oldest, "evicted least recently used tenant");
        }

        cache.handles.insert(tenant, handle.clone());
        cache.touch(tenant);
        Ok(handle)
    }

    /// Drop a cached handle. Returns whether one was cached.
    pub async fn evict(&self, tenant: TenantId) -> bool {
        let removed = self.cache.lock().await.remove(tenant);
        if removed {
            debug!(tenant = %tenant, "evicted tenant");
        }
        removed
    }

    /// Tenants with a cached handle, least recently used first.
    pub async fn connected(&self) -> Vec<TenantId> {
        self.cache.lock().await.order.iter().copied().collect()
    }

    pub fn is_configured(&self, tenant: TenantId) -> bool {
        self.configs.contains_key(&tenant)
    }
}
