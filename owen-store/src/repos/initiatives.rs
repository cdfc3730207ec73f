//! Initiative repository - lifecycle over the tenant graph
//!
//! - create: node first, then membership, metrics and ownership as separate
//!   round trips. A failing follow-up step is logged and does not undo the node.
//! - delete / complete only flip `Status`; nodes and edges stay.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

use owen_core::{
    Audience, Initiative, InitiativeCategory, InitiativeDraft, InitiativeId, InitiativeQuery,
    InitiativeStatus, TeamScope, TenantId,
};

use crate::db::{first_flag, ProcParam, Procedure};
use crate::error::{DbError, DbResult};
use crate::graph::{InitiativeNode, Relation};
use crate::metrics::MetricSource;
use crate::registry::{TenantHandle, TenantRegistry};

pub struct InitiativeRepo<'a> {
    tenants: &'a TenantRegistry,
    metrics: &'a dyn MetricSource,
}

impl<'a> InitiativeRepo<'a> {
    pub fn new(tenants: &'a TenantRegistry, metrics: &'a dyn MetricSource) -> Self {
        Self { tenants, metrics }
    }

    /// Create an initiative and return its id.
    #[instrument(skip(self, draft), fields(tenant = %tenant, category = %draft.category()))]
    pub async fn create(&self, tenant: TenantId, draft: &InitiativeDraft) -> DbResult<InitiativeId> {
        let handle = self.tenants.connect(tenant).await?;
        let graph = handle.graph();

        let node = InitiativeNode::from_draft(draft, Utc::now());
        let initiative_id = graph.create_initiative(&node).await?;
        if initiative_id <= 0 {
            return Err(DbError::GraphState("initiative node was not created".into()));
        }
        info!(initiative_id, status = %node.status, "created initiative node");

        match &draft.audience {
            Audience::Individual { employees } => {
                if let Err(e) = graph
                    .link_employees(initiative_id, Relation::PartOf, employees)
                    .await
                {
                    error!(initiative_id, step = "link employees", error = %e, "initiative step failed");
                }
            }
            Audience::Team { filters } => {
                let scope = TeamScope::from_filters(filters);
                for (facet, facet_scope) in scope.facets() {
                    if let Err(e) = graph.link_facet(initiative_id, facet, facet_scope).await {
                        error!(initiative_id, step = "link filters", %facet, error = %e, "initiative step failed");
                    }
                }
                if let Err(e) = self
                    .store_metrics(tenant, &handle, initiative_id, &draft.audience, &scope)
                    .await
                {
                    error!(initiative_id, step = "store metrics", error = %e, "initiative step failed");
                }
                // owners are only linked for team initiatives at creation
                if !draft.owners.is_empty() {
                    if let Err(e) = graph
                        .link_employees(initiative_id, Relation::OwnerOf, &draft.owners)
                        .await
                    {
                        error!(initiative_id, step = "link owners", error = %e, "initiative step failed");
                    }
                }
            }
        }

        Ok(initiative_id)
    }

    async fn store_metrics(
        &self,
        tenant: TenantId,
        handle: &TenantHandle,
        initiative_id: InitiativeId,
        audience: &Audience,
        scope: &TeamScope,
    ) -> DbResult<()> {
        let team_size = handle.graph().count_team(scope).await?;
        let metrics = self.metrics.metrics(tenant, initiative_id, audience).await?;
        debug!(initiative_id, team_size, metrics = metrics.len(), "storing initiative metrics");

        let calculated_at = Utc::now();
        for metric in &metrics {
            let rows = handle
                .procedures()
                .call(
                    Procedure::InsertInitiativeMetricValue,
                    &[
                        ProcParam::named("initiativeid", initiative_id),
                        ProcParam::named("metricid", metric.id),
                        ProcParam::named("metricvalue", metric.score),
                        ProcParam::named("calctime", calculated_at),
                        ProcParam::named("noemp", team_size),
                    ],
                )
                .await?;
            if !first_flag(&rows) {
                error!(initiative_id, metric_id = metric.id, "metric value was not stored");
            }
        }
        Ok(())
    }

    async fn attach_metrics(&self, tenant: TenantId, initiative: &mut Initiative) {
        match self
            .metrics
            .metrics(tenant, initiative.id, &initiative.audience)
            .await
        {
            Ok(metrics) => initiative.metrics = metrics,
            Err(e) => {
                error!(initiative_id = initiative.id, error = %e, "metric calculation failed");
            }
        }
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn get(&self, tenant: TenantId, initiative_id: InitiativeId) -> DbResult<Initiative> {
        let handle = self.tenants.connect(tenant).await?;
        let snapshot = handle
            .graph()
            .fetch_initiative(initiative_id)
            .await?
            .ok_or_else(|| DbError::not_found("initiative", initiative_id))?;

        let mut initiative = snapshot.into_initiative()?;
        self.attach_metrics(tenant, &mut initiative).await;
        Ok(initiative)
    }

    /// Initiatives of one category ordered by id. Deleted ones only when the
    /// query asks for them by status.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn list(&self, tenant: TenantId, query: &InitiativeQuery) -> DbResult<Vec<Initiative>> {
        let handle = self.tenants.connect(tenant).await?;
        let snapshots = handle.graph().list_initiatives(query).await?;

        let mut initiatives = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let mut initiative = snapshot.into_initiative()?;
            self.attach_metrics(tenant, &mut initiative).await;
            initiatives.push(initiative);
        }
        debug!(count = initiatives.len(), "listed initiatives");
        Ok(initiatives)
    }

    /// Replace owners and overwrite scalar properties. Membership edges are
    /// left as they are.
    #[instrument(skip(self, initiative), fields(tenant = %tenant, initiative_id = initiative.id))]
    pub async fn update_initiative(&self, tenant: TenantId, initiative: &Initiative) -> DbResult<bool> {
        let node = InitiativeNode::from_initiative(initiative, Utc::now())?;
        let handle = self.tenants.connect(tenant).await?;
        let graph = handle.graph();

        graph.unlink_owners(initiative.id).await?;
        if !initiative.owners.is_empty() {
            graph
                .link_employees(initiative.id, Relation::OwnerOf, &initiative.owners)
                .await?;
        }

        if !graph.update_initiative(initiative.id, &node).await? {
            return Err(DbError::not_found("initiative", initiative.id));
        }
        info!(status = %node.status, "updated initiative");
        Ok(true)
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn delete(&self, tenant: TenantId, initiative_id: InitiativeId) -> DbResult<bool> {
        self.set_status(tenant, initiative_id, InitiativeStatus::Deleted)
            .await
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn complete(&self, tenant: TenantId, initiative_id: InitiativeId) -> DbResult<bool> {
        self.set_status(tenant, initiative_id, InitiativeStatus::Completed)
            .await
    }

    async fn set_status(
        &self,
        tenant: TenantId,
        initiative_id: InitiativeId,
        status: InitiativeStatus,
    ) -> DbResult<bool> {
        let handle = self.tenants.connect(tenant).await?;
        if !handle.graph().set_status(initiative_id, status).await? {
            return Err(DbError::not_found("initiative", initiative_id));
        }
        info!(initiative_id, %status, "initiative status changed");
        Ok(true)
    }

    /// Initiative type id to display name for one category.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn initiative_type_map(
        &self,
        tenant: TenantId,
        category: InitiativeCategory,
    ) -> DbResult<HashMap<i64, String>> {
        let handle = self.tenants.connect(tenant).await?;
        let rows = handle
            .procedures()
            .call(
                Procedure::GetInitiativeTypeList,
                &[ProcParam::positional(category.as_str())],
            )
            .await?;

        rows.iter()
            .map(|row| Ok((row.int_at(1)?, row.text_at(2)?)))
            .collect()
    }
}
