//! Initiative graph - node/edge model and the graph-store seam
//!
//! Graph layout per tenant:
//!
//! - `(:Init {Id, Status, Name, Type, Category, StartDate, EndDate,
//!   CreatedOn, CreatedByEmpId, Comment})`
//! - `(:Employee {emp_id})`, `(:Function|Position|Zone {Id, Name})`
//! - `(Employee|Function|Position|Zone)-[:part_of]->(Init)`
//! - `(Employee)-[:owner_of]->(Init)`
//! - `(Employee)-[:has_functionality]->(Function)`,
//!   `(Employee)-[:is_positioned]->(Position)`, `(Employee)-[:from_zone]->(Zone)`

pub mod cypher;
pub mod neo4j;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use owen_core::dates::{end_of_day, format_date_time, parse_date_time, start_of_day};
use owen_core::{
    Audience, EmployeeId, Facet, FacetScope, Filter, Initiative, InitiativeCategory,
    InitiativeDraft, InitiativeId, InitiativeQuery, InitiativeStatus, OwenError, TeamScope,
};

use crate::error::DbResult;

pub use cypher::{CypherParam, CypherQuery};
pub use neo4j::Neo4jGraph;

/// Edge types pointing at an initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    PartOf,
    OwnerOf,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PartOf => "part_of",
            Self::OwnerOf => "owner_of",
        }
    }
}

/// Scalar properties of an `Init` node, dates already in stored form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiativeNode {
    pub status: InitiativeStatus,
    pub name: String,
    pub type_id: i64,
    pub category: InitiativeCategory,
    pub start_date: String,
    pub end_date: String,
    pub created_on: String,
    pub created_by: EmployeeId,
    pub comment: String,
}

impl InitiativeNode {
    /// Properties for a new node; status derived against `now`.
    pub fn from_draft(draft: &InitiativeDraft, now: DateTime<Utc>) -> Self {
        Self {
            status: InitiativeStatus::derive(draft.start_date, now),
            name: draft.name.clone(),
            type_id: draft.type_id,
            category: draft.category(),
            start_date: format_date_time(start_of_day(draft.start_date)),
            end_date: format_date_time(end_of_day(draft.end_date)),
            created_on: format_date_time(draft.created_on),
            created_by: draft.created_by,
            comment: draft.comment.clone(),
        }
    }

    /// Properties overwritten by an update; status re-derived against `now`.
    pub fn from_initiative(initiative: &Initiative, now: DateTime<Utc>) -> DbResult<Self> {
        let context = format!("initiative {}", initiative.id);
        let start = initiative
            .start_date
            .ok_or_else(|| OwenError::missing_field("start_date", &context))?;
        let end = initiative
            .end_date
            .ok_or_else(|| OwenError::missing_field("end_date", &context))?;
        let created_on = initiative
            .created_on
            .ok_or_else(|| OwenError::missing_field("created_on", &context))?;

        Ok(Self {
            status: InitiativeStatus::derive(start, now),
            name: initiative.name.clone(),
            type_id: initiative.type_id,
            category: initiative.category(),
            start_date: format_date_time(start_of_day(start)),
            end_date: format_date_time(end_of_day(end)),
            created_on: format_date_time(created_on),
            created_by: initiative.created_by,
            comment: initiative.comment.clone(),
        })
    }
}

/// A node pointing at an initiative through `part_of`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// `emp_id` for employees, `Id` for facet nodes
    pub id: i64,
    pub name: Option<String>,
    pub label: Option<String>,
}

/// An initiative as read back from the graph, before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiativeSnapshot {
    pub id: InitiativeId,
    pub status: String,
    pub name: String,
    pub type_id: i64,
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    pub created_on: String,
    pub created_by: EmployeeId,
    pub comment: String,
    pub members: Vec<MemberRef>,
    pub owners: Vec<EmployeeId>,
}

impl InitiativeSnapshot {
    /// Interpret stored strings; team members regroup into one filter per label.
    pub fn into_initiative(self) -> DbResult<Initiative> {
        let category: InitiativeCategory = self.category.parse()?;
        let status: InitiativeStatus = self.status.parse()?;

        let audience = match category {
            InitiativeCategory::Individual => Audience::Individual {
                employees: self.members.iter().map(|m| m.id).collect(),
            },
            InitiativeCategory::Team => {
                let mut grouped: BTreeMap<String, Filter> = BTreeMap::new();
                for member in &self.members {
                    let label = member.label.clone().unwrap_or_default();
                    let filter = grouped.entry(label.clone()).or_insert_with(|| Filter {
                        name: label,
                        values: BTreeMap::new(),
                    });
                    filter
                        .values
                        .insert(member.id, member.name.clone().unwrap_or_default());
                }
                Audience::Team {
                    filters: grouped.into_values().collect(),
                }
            }
        };

        Ok(Initiative {
            id: self.id,
            name: self.name,
            type_id: self.type_id,
            status,
            start_date: parse_optional_date(&self.start_date)?,
            end_date: parse_optional_date(&self.end_date)?,
            created_on: parse_optional_date(&self.created_on)?,
            created_by: self.created_by,
            comment: self.comment,
            audience,
            owners: self.owners,
            metrics: Vec::new(),
        })
    }
}

fn parse_optional_date(value: &str) -> DbResult<Option<DateTime<Utc>>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(parse_date_time(value)?))
}

/// Graph operations the initiative lifecycle needs, one round trip each
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the `Init` node with the next sequential id and return it.
    async fn create_initiative(&self, node: &InitiativeNode) -> DbResult<InitiativeId>;

    /// `relation` edges from each listed employee to the initiative.
    async fn link_employees(
        &self,
        initiative_id: InitiativeId,
        relation: Relation,
        employees: &[EmployeeId],
    ) -> DbResult<()>;

    /// `part_of` edges from the facet nodes selected by `scope`.
    async fn link_facet(
        &self,
        initiative_id: InitiativeId,
        facet: Facet,
        scope: &FacetScope,
    ) -> DbResult<()>;

    /// Employees matching every restricted facet of `scope` at once.
    async fn count_team(&self, scope: &TeamScope) -> DbResult<i64>;

    /// Drop every `owner_of` edge into the initiative.
    async fn unlink_owners(&self, initiative_id: InitiativeId) -> DbResult<()>;

    async fn fetch_initiative(
        &self,
        initiative_id: InitiativeId,
    ) -> DbResult<Option<InitiativeSnapshot>>;

    async fn list_initiatives(&self, query: &InitiativeQuery) -> DbResult<Vec<InitiativeSnapshot>>;

    /// Overwrite scalar properties. `false` when no such node exists.
    async fn update_initiative(
        &self,
        initiative_id: InitiativeId,
        node: &InitiativeNode,
    ) -> DbResult<bool>;

    /// `false` when no such node exists.
    async fn set_status(
        &self,
        initiative_id: InitiativeId,
        status: InitiativeStatus,
    ) -> DbResult<bool>;
}
