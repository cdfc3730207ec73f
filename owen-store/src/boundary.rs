//! Lenient outer boundary
//!
//! The upper tier expects data-access calls never to fail: a failure shows
//! up as 0, `false`, an empty collection or a blank record, and the cause is
//! logged here. Everything below this module returns typed errors.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use tracing::error;

use owen_core::{
    Aggregation, BasicEmployeeDetails, EducationDetails, EmployeeId, Initiative,
    InitiativeCategory, InitiativeDraft, InitiativeId, InitiativeQuery, LanguageDetails, Response,
    TenantId, WorkExperience,
};

use crate::error::DbResult;
use crate::metrics::MetricSource;
use crate::registry::TenantRegistry;
use crate::repos::{EmployeeRepo, InitiativeRepo, ResponseRecorder};

fn or_default<T: Default>(operation: &str, tenant: impl Display, result: DbResult<T>) -> T {
    result.unwrap_or_else(|e| {
        error!(operation, tenant = %tenant, error = %e, "operation failed");
        T::default()
    })
}

pub struct Lenient<'a> {
    initiatives: InitiativeRepo<'a>,
    responses: ResponseRecorder<'a>,
    employees: EmployeeRepo<'a>,
}

impl<'a> Lenient<'a> {
    pub fn new(
        tenants: &'a TenantRegistry,
        metrics: &'a dyn MetricSource,
        aggregate: Aggregation,
    ) -> Self {
        Self {
            initiatives: InitiativeRepo::new(tenants, metrics),
            responses: ResponseRecorder::with_aggregation(tenants, aggregate),
            employees: EmployeeRepo::new(tenants),
        }
    }

    /// 0 when the node could not be created.
    pub async fn create_initiative(&self, tenant: TenantId, draft: &InitiativeDraft) -> InitiativeId {
        or_default("create initiative", tenant, self.initiatives.create(tenant, draft).await)
    }

    /// A blank initiative carrying only the requested id on failure.
    pub async fn get_initiative(&self, tenant: TenantId, initiative_id: InitiativeId) -> Initiative {
        match self.initiatives.get(tenant, initiative_id).await {
            Ok(initiative) => initiative,
            Err(e) => {
                error!(operation = "get initiative", tenant = %tenant, initiative_id, error = %e, "operation failed");
                Initiative::blank(initiative_id)
            }
        }
    }

    pub async fn list_initiatives(&self, tenant: TenantId, query: &InitiativeQuery) -> Vec<Initiative> {
        or_default("list initiatives", tenant, self.initiatives.list(tenant, query).await)
    }

    pub async fn update_initiative(&self, tenant: TenantId, initiative: &Initiative) -> bool {
        or_default(
            "update initiative",
            tenant,
            self.initiatives.update_initiative(tenant, initiative).await,
        )
    }

    pub async fn delete_initiative(&self, tenant: TenantId, initiative_id: InitiativeId) -> bool {
        or_default("delete initiative", tenant, self.initiatives.delete(tenant, initiative_id).await)
    }

    pub async fn complete_initiative(&self, tenant: TenantId, initiative_id: InitiativeId) -> bool {
        or_default(
            "complete initiative",
            tenant,
            self.initiatives.complete(tenant, initiative_id).await,
        )
    }

    pub async fn initiative_type_map(
        &self,
        tenant: TenantId,
        category: InitiativeCategory,
    ) -> HashMap<i64, String> {
        or_default(
            "initiative types",
            tenant,
            self.initiatives.initiative_type_map(tenant, category).await,
        )
    }

    pub async fn save_me_response(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        value: i32,
    ) -> bool {
        or_default(
            "save ME response",
            tenant,
            self.responses
                .save_me_response(tenant, employee_id, question_id, value)
                .await,
        )
    }

    pub async fn save_we_response(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        target: EmployeeId,
        value: i32,
    ) -> bool {
        or_default(
            "save WE response",
            tenant,
            self.responses
                .save_we_response(tenant, employee_id, question_id, target, value)
                .await,
        )
    }

    pub async fn save_we_ratings(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        ratings: &BTreeMap<EmployeeId, i32>,
    ) -> bool {
        or_default(
            "save WE ratings",
            tenant,
            self.responses
                .save_we_ratings(tenant, employee_id, question_id, ratings)
                .await,
        )
    }

    pub async fn save_all_responses(&self, responses: &[Response]) -> bool {
        self.responses.save_all_responses(responses).await
    }

    /// Default details (employee id set) when the lookup fails.
    pub async fn basic_details(&self, tenant: TenantId, employee_id: EmployeeId) -> BasicEmployeeDetails {
        match self.employees.basic_details(tenant, employee_id).await {
            Ok(details) => details,
            Err(e) => {
                error!(operation = "basic details", tenant = %tenant, employee_id, error = %e, "operation failed");
                BasicEmployeeDetails {
                    employee_id,
                    ..Default::default()
                }
            }
        }
    }

    pub async fn work_experience(&self, tenant: TenantId, employee_id: EmployeeId) -> Vec<WorkExperience> {
        or_default("work experience", tenant, self.employees.work_experience(tenant, employee_id).await)
    }

    pub async fn education(&self, tenant: TenantId, employee_id: EmployeeId) -> Vec<EducationDetails> {
        or_default("education", tenant, self.employees.education(tenant, employee_id).await)
    }

    pub async fn languages(&self, tenant: TenantId, employee_id: EmployeeId) -> Vec<LanguageDetails> {
        or_default("languages", tenant, self.employees.languages(tenant, employee_id).await)
    }

    pub async fn language_master(&self, tenant: TenantId) -> HashMap<i64, String> {
        or_default("language list", tenant, self.employees.language_master(tenant).await)
    }

    pub async fn remove_work_experience(&self, tenant: TenantId, work_experience_id: i64) -> bool {
        or_default(
            "remove work experience",
            tenant,
            self.employees
                .remove_work_experience(tenant, work_experience_id)
                .await,
        )
    }

    pub async fn remove_education(&self, tenant: TenantId, education_id: i64) -> bool {
        or_default(
            "remove education",
            tenant,
            self.employees.remove_education(tenant, education_id).await,
        )
    }

    pub async fn remove_language(&self, tenant: TenantId, language_details_id: i64) -> bool {
        or_default(
            "remove language",
            tenant,
            self.employees.remove_language(tenant, language_details_id).await,
        )
    }

    pub async fn update_basic_details(&self, tenant: TenantId, details: &BasicEmployeeDetails) -> bool {
        or_default(
            "update basic details",
            tenant,
            self.employees.update_basic_details(tenant, details).await,
        )
    }

    pub async fn add_work_experience(&self, tenant: TenantId, entry: &WorkExperience) -> bool {
        or_default(
            "add work experience",
            tenant,
            self.employees.add_work_experience(tenant, entry).await,
        )
    }

    pub async fn add_education(&self, tenant: TenantId, entry: &EducationDetails) -> bool {
        or_default("add education", tenant, self.employees.add_education(tenant, entry).await)
    }

    pub async fn add_language(&self, tenant: TenantId, entry: &LanguageDetails) -> bool {
        or_default("add language", tenant, self.employees.add_language(tenant, entry).await)
    }
}
