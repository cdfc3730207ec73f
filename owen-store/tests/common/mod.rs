//! Shared fixtures: in-memory stores behind a registry
#![allow(dead_code)]

pub mod memory_graph;
pub mod scripted;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use owen_core::{OwenConfig, TenantConfig, TenantId};
use owen_store::{DbResult, TenantConnector, TenantHandle, TenantRegistry};
use tracing_subscriber::EnvFilter;

pub use memory_graph::{MemoryGraph, NodeRef};
pub use scripted::{op, text, RecordedCall, ScriptedProcedures};

pub const TENANT: TenantId = TenantId(2);

/// Route repository logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hands out the same fakes for every tenant and counts connections.
pub struct FakeConnector {
    pub graph: Arc<MemoryGraph>,
    pub procedures: Arc<ScriptedProcedures>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new(graph: MemoryGraph, procedures: ScriptedProcedures) -> Self {
        Self {
            graph: Arc::new(graph),
            procedures: Arc::new(procedures),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantConnector for FakeConnector {
    async fn connect(&self, _config: &TenantConfig) -> DbResult<TenantHandle> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(TenantHandle::new(self.procedures.clone(), self.graph.clone()))
    }
}

pub fn tenant_config(id: i64) -> TenantConfig {
    TenantConfig {
        id: TenantId(id),
        database_url: format!("postgres://localhost/company_{}", id),
        max_connections: 2,
        graph_uri: "bolt://localhost:7687".to_string(),
        graph_user: "neo4j".to_string(),
        graph_password: "secret".to_string(),
    }
}

pub fn config(tenants: &[i64], max_tenants: usize) -> OwenConfig {
    let mut config = OwenConfig::default();
    config.registry.max_tenants = max_tenants;
    config.tenants = tenants.iter().map(|id| tenant_config(*id)).collect();
    config
}

pub struct Fixture {
    pub connector: Arc<FakeConnector>,
    pub registry: TenantRegistry,
}

impl Fixture {
    pub fn new(graph: MemoryGraph, procedures: ScriptedProcedures) -> Self {
        init_tracing();
        let connector = Arc::new(FakeConnector::new(graph, procedures));
        let registry = TenantRegistry::with_connector(&config(&[TENANT.get()], 4), connector.clone());
        Self {
            connector,
            registry,
        }
    }

    pub fn graph(&self) -> &MemoryGraph {
        &self.connector.graph
    }

    pub fn procedures(&self) -> &ScriptedProcedures {
        &self.connector.procedures
    }
}

/// Three functions, two positions, two zones and six employees spread
/// across them.
pub fn org_graph() -> MemoryGraph {
    use owen_core::Facet;

    MemoryGraph::new()
        .with_facet(Facet::Function, 1, "Sales")
        .with_facet(Facet::Function, 2, "Finance")
        .with_facet(Facet::Function, 3, "Engineering")
        .with_facet(Facet::Position, 10, "Manager")
        .with_facet(Facet::Position, 11, "Analyst")
        .with_facet(Facet::Zone, 20, "North")
        .with_facet(Facet::Zone, 21, "South")
        .with_employee(101, 1, 10, 20)
        .with_employee(102, 1, 11, 20)
        .with_employee(103, 2, 11, 21)
        .with_employee(104, 3, 10, 21)
        .with_employee(105, 3, 11, 20)
        .with_employee(106, 1, 11, 21)
}
