//! Repositories over a tenant's stores
//!
//! Each repository borrows the [`TenantRegistry`](crate::registry::TenantRegistry),
//! resolves the tenant's handle per call and returns typed `DbResult`s.
//! Callers that must never see an error go through [`crate::boundary::Lenient`].

pub mod employees;
pub mod initiatives;
pub mod responses;

pub use employees::EmployeeRepo;
pub use initiatives::InitiativeRepo;
pub use responses::ResponseRecorder;
