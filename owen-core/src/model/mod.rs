//! Entity records
//!
//! Plain data holders shared by the store and the CLI. Enumerated fields
//! parse case-insensitively and render in the exact casing the databases
//! store.

pub mod employee;
pub mod filter;
pub mod initiative;
pub mod metric;
pub mod survey;
pub mod tenant;

pub use employee::{BasicEmployeeDetails, EducationDetails, EmployeeId, LanguageDetails, WorkExperience};
pub use filter::{Facet, FacetScope, Filter, TeamScope, ALL_VALUES};
pub use initiative::{
    Audience, Initiative, InitiativeCategory, InitiativeDraft, InitiativeId, InitiativeQuery,
    InitiativeStatus,
};
pub use metric::{Direction, Metric};
pub use survey::{QuestionType, Response};
pub use tenant::TenantId;
