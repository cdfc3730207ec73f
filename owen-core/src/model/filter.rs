//! Applicability filters for team initiatives
//!
//! A filter names an organisational facet and maps facet-value ids to display
//! names. The id [`ALL_VALUES`] is a sentinel meaning "every value of this
//! facet".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel facet-value id: no restriction on this facet.
pub const ALL_VALUES: i64 = 0;

/// Organisational facets known to the graph (one node label each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Facet {
    Function,
    Position,
    Zone,
}

impl Facet {
    /// Every known facet, in the order membership edges are created.
    pub const ALL: [Facet; 3] = [Facet::Function, Facet::Position, Facet::Zone];

    /// Parse a facet from a filter name. Unknown names are `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "function" => Some(Self::Function),
            "position" => Some(Self::Position),
            "zone" => Some(Self::Zone),
            _ => None,
        }
    }

    /// Graph node label for this facet.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Function => "Function",
            Self::Position => "Position",
            Self::Zone => "Zone",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named facet with the selected value ids and their display names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub values: BTreeMap<i64, String>,
}

impl Filter {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(|(id, label)| (id, label.into())).collect(),
        }
    }

    /// Filter selecting every value of the facet.
    pub fn all(name: impl Into<String>) -> Self {
        Self::new(name, [(ALL_VALUES, "All")])
    }

    pub fn facet(&self) -> Option<Facet> {
        Facet::parse(&self.name)
    }

    pub fn scope(&self) -> FacetScope {
        if self.values.contains_key(&ALL_VALUES) {
            FacetScope::All
        } else {
            FacetScope::Only(self.values.keys().copied().collect())
        }
    }
}

/// Which nodes of a facet a filter selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetScope {
    All,
    Only(Vec<i64>),
}

impl FacetScope {
    pub fn matches(&self, id: i64) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }

    fn merge(self, other: FacetScope) -> FacetScope {
        match (self, other) {
            (Self::Only(mut ids), Self::Only(more)) => {
                for id in more {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                Self::Only(ids)
            }
            _ => Self::All,
        }
    }
}

/// Per-facet scopes contributed by a filter list.
///
/// A facet with no filter is absent. Several filters on the same facet merge
/// (any sentinel wins, otherwise the id sets are unioned).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamScope {
    scopes: BTreeMap<Facet, FacetScope>,
}

impl TeamScope {
    pub fn from_filters(filters: &[Filter]) -> Self {
        let mut scopes: BTreeMap<Facet, FacetScope> = BTreeMap::new();
        for filter in filters {
            let Some(facet) = filter.facet() else {
                continue;
            };
            let scope = filter.scope();
            let merged = match scopes.remove(&facet) {
                Some(existing) => existing.merge(scope),
                None => scope,
            };
            scopes.insert(facet, merged);
        }
        Self { scopes }
    }

    pub fn get(&self, facet: Facet) -> Option<&FacetScope> {
        self.scopes.get(&facet)
    }

    /// Facets present in the filter list with their scopes.
    pub fn facets(&self) -> impl Iterator<Item = (Facet, &FacetScope)> {
        self.scopes.iter().map(|(facet, scope)| (*facet, scope))
    }

    /// Ids a team member must match on `facet`, or `None` when unrestricted.
    ///
    /// An empty id set counts as unrestricted for team sizing.
    pub fn restriction(&self, facet: Facet) -> Option<&[i64]> {
        match self.scopes.get(&facet) {
            Some(FacetScope::Only(ids)) if !ids.is_empty() => Some(ids.as_slice()),
            _ => None,
        }
    }
}
