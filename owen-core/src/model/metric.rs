//! Initiative metrics (computed elsewhere, persisted by the store)

use serde::{Deserialize, Serialize};

/// Whether a higher score is an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub average: f64,
    pub direction: Direction,
    pub score: i32,
}
