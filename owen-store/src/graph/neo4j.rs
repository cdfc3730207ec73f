//! Neo4j-backed [`GraphStore`]

use async_trait::async_trait;
use neo4rs::{Graph, Row};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use owen_core::{
    EmployeeId, Facet, FacetScope, InitiativeId, InitiativeQuery, InitiativeStatus, TeamScope,
};

use super::cypher::{self, CypherQuery};
use super::{GraphStore, InitiativeNode, InitiativeSnapshot, MemberRef, Relation};
use crate::error::{DbError, DbResult};

#[derive(Clone)]
pub struct Neo4jGraph {
    graph: Arc<Graph>,
}

#[derive(Debug, Deserialize)]
struct MemberRow {
    id: i64,
    name: Option<String>,
    label: Option<String>,
}

impl Neo4jGraph {
    pub async fn connect(uri: &str, user: &str, password: &str) -> DbResult<Self> {
        let graph = Graph::new(uri, user, password).await?;
        Ok(Self::from_graph(Arc::new(graph)))
    }

    pub fn from_graph(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    async fn rows(&self, cypher: CypherQuery) -> DbResult<Vec<Row>> {
        debug!(query = %cypher.text, params = cypher.params.len(), "cypher");
        let mut result = self.graph.execute(cypher.into_query()).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn run(&self, cypher: CypherQuery) -> DbResult<()> {
        debug!(query = %cypher.text, params = cypher.params.len(), "cypher");
        self.graph.run(cypher.into_query()).await?;
        Ok(())
    }
}

fn snapshot_from_row(row: &Row) -> DbResult<InitiativeSnapshot> {
    let members: Vec<MemberRow> = row.get("Members")?;
    Ok(InitiativeSnapshot {
        id: row.get("Id")?,
        status: row.get::<Option<String>>("Status")?.unwrap_or_default(),
        name: row.get::<Option<String>>("Name")?.unwrap_or_default(),
        type_id: row.get::<Option<i64>>("Type")?.unwrap_or_default(),
        category: row.get::<Option<String>>("Category")?.unwrap_or_default(),
        start_date: row.get::<Option<String>>("StartDate")?.unwrap_or_default(),
        end_date: row.get::<Option<String>>("EndDate")?.unwrap_or_default(),
        created_on: row.get::<Option<String>>("CreatedOn")?.unwrap_or_default(),
        created_by: row.get::<Option<i64>>("CreatedByEmpId")?.unwrap_or_default(),
        comment: row.get::<Option<String>>("Comment")?.unwrap_or_default(),
        members: members
            .into_iter()
            .map(|m| MemberRef {
                id: m.id,
                name: m.name,
                label: m.label,
            })
            .collect(),
        owners: row.get("Owners")?,
    })
}

#[async_trait]
impl GraphStore for Neo4jGraph {
    async fn create_initiative(&self, node: &InitiativeNode) -> DbResult<InitiativeId> {
        let rows = self.rows(cypher::create_initiative(node)).await?;
        match rows.first() {
            Some(row) => Ok(row.get("Id")?),
            None => Err(DbError::GraphState("initiative node was not created".into())),
        }
    }

    async fn link_employees(
        &self,
        initiative_id: InitiativeId,
        relation: Relation,
        employees: &[EmployeeId],
    ) -> DbResult<()> {
        if employees.is_empty() {
            return Ok(());
        }
        self.run(cypher::link_employees(initiative_id, relation, employees))
            .await
    }

    async fn link_facet(
        &self,
        initiative_id: InitiativeId,
        facet: Facet,
        scope: &FacetScope,
    ) -> DbResult<()> {
        if matches!(scope, FacetScope::Only(ids) if ids.is_empty()) {
            return Ok(());
        }
        self.run(cypher::link_facet(initiative_id, facet, scope)).await
    }

    async fn count_team(&self, scope: &TeamScope) -> DbResult<i64> {
        let rows = self.rows(cypher::team_size(scope)).await?;
        match rows.first() {
            Some(row) => Ok(row.get("TeamSize")?),
            None => Ok(0),
        }
    }

    async fn unlink_owners(&self, initiative_id: InitiativeId) -> DbResult<()> {
        self.run(cypher::unlink_owners(initiative_id)).await
    }

    async fn fetch_initiative(
        &self,
        initiative_id: InitiativeId,
    ) -> DbResult<Option<InitiativeSnapshot>> {
        let rows = self.rows(cypher::fetch_initiative(initiative_id)).await?;
        rows.first().map(snapshot_from_row).transpose()
    }

    async fn list_initiatives(&self, query: &InitiativeQuery) -> DbResult<Vec<InitiativeSnapshot>> {
        let rows = self.rows(cypher::list_initiatives(query)).await?;
        rows.iter().map(snapshot_from_row).collect()
    }

    async fn update_initiative(
        &self,
        initiative_id: InitiativeId,
        node: &InitiativeNode,
    ) -> DbResult<bool> {
        let rows = self
            .rows(cypher::update_initiative(initiative_id, node))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn set_status(
        &self,
        initiative_id: InitiativeId,
        status: InitiativeStatus,
    ) -> DbResult<bool> {
        let rows = self.rows(cypher::set_status(initiative_id, status)).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owen_core::InitiativeCategory;

    fn env(name: &str, default: &str) -> String {
        std::env::var(name).unwrap_or_else(|_| default.to_string())
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_and_fetch_round_trip() {
        let graph = Neo4jGraph::connect(
            &env("OWEN_TEST_GRAPH_URI", "127.0.0.1:7687"),
            &env("OWEN_TEST_GRAPH_USER", "neo4j"),
            &env("OWEN_TEST_GRAPH_PASSWORD", "neo4j"),
        )
        .await
        .expect("connect to neo4j");

        let node = InitiativeNode {
            status: InitiativeStatus::Active,
            name: "round trip".into(),
            type_id: 1,
            category: InitiativeCategory::Individual,
            start_date: "2016-01-04 00:00:00".into(),
            end_date: "2016-02-03 23:59:59".into(),
            created_on: "2016-01-01 15:30:00".into(),
            created_by: 1,
            comment: "".into(),
        };
        let id = graph.create_initiative(&node).await.unwrap();
        assert!(id > 0);

        let snapshot = graph.fetch_initiative(id).await.unwrap().unwrap();
        assert_eq!(snapshot.name, "round trip");
        assert!(graph.set_status(id, InitiativeStatus::Deleted).await.unwrap());
    }
}
