//! Initiative records and lifecycle enums

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::employee::EmployeeId;
use super::filter::Filter;
use super::metric::Metric;
use crate::error::OwenError;

pub type InitiativeId = i64;

/// Team initiatives target facets, individual ones target employees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitiativeCategory {
    Team,
    Individual,
}

impl InitiativeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "Team",
            Self::Individual => "Individual",
        }
    }
}

impl FromStr for InitiativeCategory {
    type Err = OwenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "team" => Ok(Self::Team),
            "individual" => Ok(Self::Individual),
            _ => Err(OwenError::invalid_variant("initiative category", s)),
        }
    }
}

impl fmt::Display for InitiativeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state stored on the initiative node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitiativeStatus {
    Pending,
    Active,
    Completed,
    Deleted,
}

impl InitiativeStatus {
    /// Status implied by the start date: `Pending` while `start` is strictly
    /// after `now`, `Active` afterwards.
    ///
    /// `Completed` and `Deleted` are never derived.
    pub fn derive(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if start > now {
            Self::Pending
        } else {
            Self::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Deleted => "Deleted",
        }
    }
}

impl FromStr for InitiativeStatus {
    type Err = OwenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(OwenError::invalid_variant("initiative status", s)),
        }
    }
}

impl fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an initiative applies to. The category follows from the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    Team { filters: Vec<Filter> },
    Individual { employees: Vec<EmployeeId> },
}

impl Audience {
    pub fn category(&self) -> InitiativeCategory {
        match self {
            Self::Team { .. } => InitiativeCategory::Team,
            Self::Individual { .. } => InitiativeCategory::Individual,
        }
    }

    /// Empty audience of the given category.
    pub fn empty(category: InitiativeCategory) -> Self {
        match category {
            InitiativeCategory::Team => Self::Team { filters: Vec::new() },
            InitiativeCategory::Individual => Self::Individual {
                employees: Vec::new(),
            },
        }
    }

    pub fn filters(&self) -> &[Filter] {
        match self {
            Self::Team { filters } => filters,
            Self::Individual { .. } => &[],
        }
    }

    pub fn employees(&self) -> &[EmployeeId] {
        match self {
            Self::Team { .. } => &[],
            Self::Individual { employees } => employees,
        }
    }
}

/// Everything needed to create an initiative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeDraft {
    pub name: String,
    pub type_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_on: DateTime<Utc>,
    pub created_by: EmployeeId,
    pub comment: String,
    pub audience: Audience,
    pub owners: Vec<EmployeeId>,
}

impl InitiativeDraft {
    pub fn category(&self) -> InitiativeCategory {
        self.audience.category()
    }
}

/// A stored initiative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: InitiativeId,
    pub name: String,
    pub type_id: i64,
    pub status: InitiativeStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_on: Option<DateTime<Utc>>,
    pub created_by: EmployeeId,
    pub comment: String,
    pub audience: Audience,
    pub owners: Vec<EmployeeId>,
    pub metrics: Vec<Metric>,
}

impl Initiative {
    /// Placeholder returned when a lookup fails at the lenient boundary.
    pub fn blank(id: InitiativeId) -> Self {
        Self {
            id,
            name: String::new(),
            type_id: 0,
            status: InitiativeStatus::Pending,
            start_date: None,
            end_date: None,
            created_on: None,
            created_by: 0,
            comment: String::new(),
            audience: Audience::empty(InitiativeCategory::Team),
            owners: Vec::new(),
            metrics: Vec::new(),
        }
    }

    pub fn category(&self) -> InitiativeCategory {
        self.audience.category()
    }
}

/// Selection for initiative listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiativeQuery {
    pub category: InitiativeCategory,
    pub status: Option<InitiativeStatus>,
    pub type_id: Option<i64>,
}

impl InitiativeQuery {
    pub fn category(category: InitiativeCategory) -> Self {
        Self {
            category,
            status: None,
            type_id: None,
        }
    }

    pub fn with_status(mut self, status: InitiativeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_type(mut self, type_id: i64) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Deleted initiatives only show up when asked for by status.
    pub fn includes_deleted(&self) -> bool {
        self.status == Some(InitiativeStatus::Deleted)
    }
}
