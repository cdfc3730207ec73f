//! In-memory `GraphStore` with the same matching rules as the Cypher builders

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use owen_core::{
    EmployeeId, Facet, FacetScope, InitiativeCategory, InitiativeId, InitiativeQuery,
    InitiativeStatus, TeamScope,
};
use owen_store::graph::{GraphStore, InitiativeNode, InitiativeSnapshot, MemberRef, Relation};
use owen_store::{DbError, DbResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Employee(EmployeeId),
    Facet(Facet, i64),
}

#[derive(Debug, Clone)]
struct Employee {
    emp_id: EmployeeId,
    function: i64,
    position: i64,
    zone: i64,
}

#[derive(Default)]
struct State {
    initiatives: BTreeMap<InitiativeId, InitiativeNode>,
    employees: Vec<Employee>,
    facets: BTreeMap<Facet, BTreeMap<i64, String>>,
    edges: Vec<(NodeRef, Relation, InitiativeId)>,
    failing: HashSet<&'static str>,
}

#[derive(Default)]
pub struct MemoryGraph {
    state: Mutex<State>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facet(self, facet: Facet, id: i64, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .facets
            .entry(facet)
            .or_default()
            .insert(id, name.to_string());
        self
    }

    /// Employee wired to one function, position and zone node.
    pub fn with_employee(self, emp_id: EmployeeId, function: i64, position: i64, zone: i64) -> Self {
        self.state.lock().unwrap().employees.push(Employee {
            emp_id,
            function,
            position,
            zone,
        });
        self
    }

    /// Make every call of the named operation fail with a graph error.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn node(&self, id: InitiativeId) -> Option<InitiativeNode> {
        self.state.lock().unwrap().initiatives.get(&id).cloned()
    }

    /// Sources of `relation` edges into the initiative, sorted.
    pub fn sources(&self, id: InitiativeId, relation: Relation) -> Vec<NodeRef> {
        let state = self.state.lock().unwrap();
        let mut sources: Vec<NodeRef> = state
            .edges
            .iter()
            .filter(|(_, r, target)| *r == relation && *target == id)
            .map(|(source, _, _)| *source)
            .collect();
        sources.sort();
        sources
    }

    fn check(state: &State, operation: &'static str) -> DbResult<()> {
        if state.failing.contains(operation) {
            return Err(DbError::GraphState(format!("{} failed", operation)));
        }
        Ok(())
    }

    fn snapshot(state: &State, id: InitiativeId, node: &InitiativeNode) -> InitiativeSnapshot {
        let mut seen = HashSet::new();
        let mut members = Vec::new();
        let mut owners = Vec::new();

        for (source, relation, target) in &state.edges {
            if *target != id {
                continue;
            }
            match (relation, source) {
                (Relation::PartOf, NodeRef::Employee(emp_id))
                    if node.category == InitiativeCategory::Individual =>
                {
                    if seen.insert(*source) {
                        members.push(MemberRef {
                            id: *emp_id,
                            name: None,
                            label: Some("Employee".to_string()),
                        });
                    }
                }
                (Relation::PartOf, NodeRef::Facet(facet, facet_id))
                    if node.category == InitiativeCategory::Team =>
                {
                    if seen.insert(*source) {
                        members.push(MemberRef {
                            id: *facet_id,
                            name: state
                                .facets
                                .get(facet)
                                .and_then(|nodes| nodes.get(facet_id))
                                .cloned(),
                            label: Some(facet.label().to_string()),
                        });
                    }
                }
                (Relation::OwnerOf, NodeRef::Employee(emp_id)) => {
                    if !owners.contains(emp_id) {
                        owners.push(*emp_id);
                    }
                }
                _ => {}
            }
        }

        InitiativeSnapshot {
            id,
            status: node.status.as_str().to_string(),
            name: node.name.clone(),
            type_id: node.type_id,
            category: node.category.as_str().to_string(),
            start_date: node.start_date.clone(),
            end_date: node.end_date.clone(),
            created_on: node.created_on.clone(),
            created_by: node.created_by,
            comment: node.comment.clone(),
            members,
            owners,
        }
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn create_initiative(&self, node: &InitiativeNode) -> DbResult<InitiativeId> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, "create_initiative")?;
        let id = state.initiatives.keys().max().map(|max| max + 1).unwrap_or(1);
        state.initiatives.insert(id, node.clone());
        Ok(id)
    }

    async fn link_employees(
        &self,
        initiative_id: InitiativeId,
        relation: Relation,
        employees: &[EmployeeId],
    ) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, "link_employees")?;
        if !state.initiatives.contains_key(&initiative_id) {
            return Ok(());
        }
        let matched: Vec<EmployeeId> = state
            .employees
            .iter()
            .map(|e| e.emp_id)
            .filter(|id| employees.contains(id))
            .collect();
        for emp_id in matched {
            state
                .edges
                .push((NodeRef::Employee(emp_id), relation, initiative_id));
        }
        Ok(())
    }

    async fn link_facet(
        &self,
        initiative_id: InitiativeId,
        facet: Facet,
        scope: &FacetScope,
    ) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, "link_facet")?;
        if !state.initiatives.contains_key(&initiative_id) {
            return Ok(());
        }
        let matched: Vec<i64> = state
            .facets
            .get(&facet)
            .map(|nodes| nodes.keys().copied().filter(|id| scope.matches(*id)).collect())
            .unwrap_or_default();
        for id in matched {
            state
                .edges
                .push((NodeRef::Facet(facet, id), Relation::PartOf, initiative_id));
        }
        Ok(())
    }

    async fn count_team(&self, scope: &TeamScope) -> DbResult<i64> {
        let state = self.state.lock().unwrap();
        Self::check(&state, "count_team")?;
        let allowed = |facet: Facet, id: i64| match scope.restriction(facet) {
            Some(ids) => ids.contains(&id),
            None => true,
        };
        let count = state
            .employees
            .iter()
            .filter(|e| {
                allowed(Facet::Function, e.function)
                    && allowed(Facet::Position, e.position)
                    && allowed(Facet::Zone, e.zone)
            })
            .count();
        Ok(count as i64)
    }

    async fn unlink_owners(&self, initiative_id: InitiativeId) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, "unlink_owners")?;
        state
            .edges
            .retain(|(_, relation, target)| !(*relation == Relation::OwnerOf && *target == initiative_id));
        Ok(())
    }

    async fn fetch_initiative(
        &self,
        initiative_id: InitiativeId,
    ) -> DbResult<Option<InitiativeSnapshot>> {
        let state = self.state.lock().unwrap();
        Self::check(&state, "fetch_initiative")?;
        Ok(state
            .initiatives
            .get(&initiative_id)
            .map(|node| Self::snapshot(&state, initiative_id, node)))
    }

    async fn list_initiatives(&self, query: &InitiativeQuery) -> DbResult<Vec<InitiativeSnapshot>> {
        let state = self.state.lock().unwrap();
        Self::check(&state, "list_initiatives")?;
        Ok(state
            .initiatives
            .iter()
            .filter(|(_, node)| node.category == query.category)
            .filter(|(_, node)| match query.status {
                Some(status) => node.status == status,
                None => node.status != InitiativeStatus::Deleted,
            })
            .filter(|(_, node)| query.type_id.map_or(true, |t| node.type_id == t))
            .map(|(id, node)| Self::snapshot(&state, *id, node))
            .collect())
    }

    async fn update_initiative(
        &self,
        initiative_id: InitiativeId,
        node: &InitiativeNode,
    ) -> DbResult<bool> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, "update_initiative")?;
        match state.initiatives.get_mut(&initiative_id) {
            Some(existing) => {
                *existing = node.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_status(
        &self,
        initiative_id: InitiativeId,
        status: InitiativeStatus,
    ) -> DbResult<bool> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, "set_status")?;
        match state.initiatives.get_mut(&initiative_id) {
            Some(existing) => {
                existing.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
