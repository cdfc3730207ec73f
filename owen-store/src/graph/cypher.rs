//! Parameterised Cypher for the initiative graph
//!
//! Builders are pure: they return the query text plus its parameters and
//! never touch a connection. Labels and relationship types are spliced from
//! [`Facet`] and [`Relation`]; everything supplied by a caller goes through
//! a `$parameter`.

use owen_core::{EmployeeId, Facet, FacetScope, InitiativeId, InitiativeQuery, InitiativeStatus, TeamScope};

use super::{InitiativeNode, Relation};

#[derive(Debug, Clone, PartialEq)]
pub enum CypherParam {
    Int(i64),
    Text(String),
    IntList(Vec<i64>),
}

impl From<i64> for CypherParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for CypherParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CypherParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<i64>> for CypherParam {
    fn from(value: Vec<i64>) -> Self {
        Self::IntList(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    pub text: String,
    pub params: Vec<(&'static str, CypherParam)>,
}

impl CypherQuery {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    fn param(mut self, name: &'static str, value: impl Into<CypherParam>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn param_value(&self, name: &str) -> Option<&CypherParam> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn into_query(self) -> neo4rs::Query {
        let mut query = neo4rs::query(&self.text);
        for (name, value) in self.params {
            query = match value {
                CypherParam::Int(v) => query.param(name, v),
                CypherParam::Text(v) => query.param(name, v),
                CypherParam::IntList(v) => query.param(name, v),
            };
        }
        query
    }
}

// Shared projection for get and list; `Members` holds employee ids for
// individual initiatives and facet node ids otherwise.
const INITIATIVE_PROJECTION: &str = "\
OPTIONAL MATCH (m)-[:part_of]->(i)
WITH i, [x IN collect(DISTINCT {
    id: CASE WHEN i.Category = 'Individual' THEN m.emp_id ELSE m.Id END,
    name: m.Name,
    label: head(labels(m))
}) WHERE x.id IS NOT NULL] AS members
OPTIONAL MATCH (o:Employee)-[:owner_of]->(i)
WITH i, members, [x IN collect(DISTINCT o.emp_id) WHERE x IS NOT NULL] AS owners
RETURN i.Id AS Id, i.Status AS Status, i.Name AS Name, i.Type AS Type,
       i.Category AS Category, i.StartDate AS StartDate, i.EndDate AS EndDate,
       i.CreatedOn AS CreatedOn, i.CreatedByEmpId AS CreatedByEmpId,
       i.Comment AS Comment, members AS Members, owners AS Owners";

/// Next id is `max(Id) + 1` over existing `Init` nodes, 1 when there are none.
pub fn create_initiative(node: &InitiativeNode) -> CypherQuery {
    CypherQuery::new(
        "\
OPTIONAL MATCH (existing:Init)
WITH CASE count(existing) WHEN 0 THEN 1 ELSE max(existing.Id) + 1 END AS uid
CREATE (i:Init {
    Id: uid, Status: $status, Name: $name, Type: $type, Category: $category,
    StartDate: $startDate, EndDate: $endDate, CreatedOn: $createdOn,
    CreatedByEmpId: $createdBy, Comment: $comment
})
RETURN i.Id AS Id",
    )
    .param("status", node.status.as_str())
    .param("name", node.name.clone())
    .param("type", node.type_id)
    .param("category", node.category.as_str())
    .param("startDate", node.start_date.clone())
    .param("endDate", node.end_date.clone())
    .param("createdOn", node.created_on.clone())
    .param("createdBy", node.created_by)
    .param("comment", node.comment.clone())
}

pub fn link_employees(
    initiative_id: InitiativeId,
    relation: Relation,
    employees: &[EmployeeId],
) -> CypherQuery {
    CypherQuery::new(format!(
        "\
MATCH (i:Init {{Id: $initiativeId}}), (e:Employee)
WHERE e.emp_id IN $employees
CREATE (e)-[:{}]->(i)",
        relation.as_str()
    ))
    .param("initiativeId", initiative_id)
    .param("employees", employees.to_vec())
}

/// `All` links every node of the facet label, `Only` the listed ids.
pub fn link_facet(initiative_id: InitiativeId, facet: Facet, scope: &FacetScope) -> CypherQuery {
    let label = facet.label();
    match scope {
        FacetScope::All => CypherQuery::new(format!(
            "\
MATCH (i:Init {{Id: $initiativeId}}), (f:{label})
CREATE (f)-[:part_of]->(i)"
        ))
        .param("initiativeId", initiative_id),
        FacetScope::Only(ids) => CypherQuery::new(format!(
            "\
MATCH (i:Init {{Id: $initiativeId}}), (f:{label})
WHERE f.Id IN $ids
CREATE (f)-[:part_of]->(i)"
        ))
        .param("initiativeId", initiative_id)
        .param("ids", ids.clone()),
    }
}

fn facet_param(facet: Facet) -> &'static str {
    match facet {
        Facet::Function => "functions",
        Facet::Position => "positions",
        Facet::Zone => "zones",
    }
}

fn facet_alias(facet: Facet) -> &'static str {
    match facet {
        Facet::Function => "f",
        Facet::Position => "p",
        Facet::Zone => "z",
    }
}

pub fn team_size(scope: &TeamScope) -> CypherQuery {
    let mut conditions = Vec::new();
    let mut params = Vec::new();
    for facet in Facet::ALL {
        if let Some(ids) = scope.restriction(facet) {
            let name = facet_param(facet);
            conditions.push(format!("{}.Id IN ${}", facet_alias(facet), name));
            params.push((name, CypherParam::IntList(ids.to_vec())));
        }
    }

    let mut text = String::from(
        "\
MATCH (a:Employee)-[:has_functionality]->(f:Function),
      (p:Position)<-[:is_positioned]-(a)-[:from_zone]->(z:Zone)",
    );
    if !conditions.is_empty() {
        text.push_str("\nWHERE ");
        text.push_str(&conditions.join(" AND "));
    }
    text.push_str("\nRETURN count(DISTINCT a) AS TeamSize");

    let mut query = CypherQuery::new(text);
    query.params = params;
    query
}

pub fn unlink_owners(initiative_id: InitiativeId) -> CypherQuery {
    CypherQuery::new(
        "\
MATCH (:Employee)-[r:owner_of]->(:Init {Id: $initiativeId})
DELETE r",
    )
    .param("initiativeId", initiative_id)
}

pub fn fetch_initiative(initiative_id: InitiativeId) -> CypherQuery {
    CypherQuery::new(format!(
        "MATCH (i:Init {{Id: $initiativeId}})\n{INITIATIVE_PROJECTION}"
    ))
    .param("initiativeId", initiative_id)
}

/// Deleted initiatives only show up when asked for by status.
pub fn list_initiatives(query: &InitiativeQuery) -> CypherQuery {
    let mut conditions = vec!["i.Category = $category"];
    if query.status.is_some() {
        conditions.push("i.Status = $status");
    } else {
        conditions.push("i.Status <> $deleted");
    }
    if query.type_id.is_some() {
        conditions.push("i.Type = $type");
    }

    let mut cypher = CypherQuery::new(format!(
        "MATCH (i:Init)\nWHERE {}\n{INITIATIVE_PROJECTION}\nORDER BY Id",
        conditions.join(" AND ")
    ))
    .param("category", query.category.as_str());

    cypher = match query.status {
        Some(status) => cypher.param("status", status.as_str()),
        None => cypher.param("deleted", InitiativeStatus::Deleted.as_str()),
    };
    if let Some(type_id) = query.type_id {
        cypher = cypher.param("type", type_id);
    }
    cypher
}

pub fn update_initiative(initiative_id: InitiativeId, node: &InitiativeNode) -> CypherQuery {
    CypherQuery::new(
        "\
MATCH (i:Init {Id: $initiativeId})
SET i.Name = $name, i.Type = $type, i.Category = $category, i.Comment = $comment,
    i.Status = $status, i.StartDate = $startDate, i.EndDate = $endDate,
    i.CreatedOn = $createdOn
RETURN i.Id AS Id",
    )
    .param("initiativeId", initiative_id)
    .param("name", node.name.clone())
    .param("type", node.type_id)
    .param("category", node.category.as_str())
    .param("comment", node.comment.clone())
    .param("status", node.status.as_str())
    .param("startDate", node.start_date.clone())
    .param("endDate", node.end_date.clone())
    .param("createdOn", node.created_on.clone())
}

pub fn set_status(initiative_id: InitiativeId, status: InitiativeStatus) -> CypherQuery {
    CypherQuery::new(
        "\
MATCH (i:Init {Id: $initiativeId})
SET i.Status = $status
RETURN i.Id AS Id",
    )
    .param("initiativeId", initiative_id)
    .param("status", status.as_str())
}
