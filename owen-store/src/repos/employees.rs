//! Employee profile accessor
//!
//! Reads go through the `getEmployee*` procedures, writes through the
//! matching insert / remove / update procedures, each reporting success in
//! a single boolean column.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, instrument};

use owen_core::{
    BasicEmployeeDetails, EducationDetails, EmployeeId, LanguageDetails, TenantId, WorkExperience,
};

use crate::db::{first_flag, ProcParam, ProcRow, Procedure};
use crate::error::{DbError, DbResult};
use crate::registry::TenantRegistry;

pub struct EmployeeRepo<'a> {
    tenants: &'a TenantRegistry,
}

impl<'a> EmployeeRepo<'a> {
    pub fn new(tenants: &'a TenantRegistry) -> Self {
        Self { tenants }
    }

    async fn call(
        &self,
        tenant: TenantId,
        procedure: Procedure,
        params: &[ProcParam],
    ) -> DbResult<Vec<ProcRow>> {
        let handle = self.tenants.connect(tenant).await?;
        handle.procedures().call(procedure, params).await
    }

    async fn mutate(
        &self,
        tenant: TenantId,
        procedure: Procedure,
        params: &[ProcParam],
    ) -> DbResult<bool> {
        let rows = self.call(tenant, procedure, params).await?;
        let ok = first_flag(&rows);
        debug!(procedure = procedure.name(), ok, "profile write");
        Ok(ok)
    }

    /// The last row wins when the procedure returns several.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn basic_details(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
    ) -> DbResult<BasicEmployeeDetails> {
        let rows = self
            .call(
                tenant,
                Procedure::GetEmployeeBasicDetails,
                &[ProcParam::positional(employee_id)],
            )
            .await?;
        let row = rows
            .last()
            .ok_or_else(|| DbError::not_found("employee", employee_id))?;

        Ok(BasicEmployeeDetails {
            employee_id,
            company_employee_id: row.text("emp_int_id")?,
            dob: row.opt_date("dob")?,
            email_id: row.text("login_id")?,
            salutation: row.text("salutation")?,
            first_name: row.text("first_name")?,
            last_name: row.text("last_name")?,
            phone: row.text("phone_no")?,
            function: row.text("Function")?,
            location: row.text("Zone")?,
            designation: row.text("Position")?,
        })
    }

    /// Most recent first; open-ended entries carry their duration as of today.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn work_experience(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
    ) -> DbResult<Vec<WorkExperience>> {
        self.work_experience_at(tenant, employee_id, Utc::now().date_naive())
            .await
    }

    pub async fn work_experience_at(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        today: NaiveDate,
    ) -> DbResult<Vec<WorkExperience>> {
        let rows = self
            .call(
                tenant,
                Procedure::GetEmployeeWorkExperience,
                &[ProcParam::positional(employee_id)],
            )
            .await?;

        let mut entries = rows
            .iter()
            .map(|row| {
                Ok(WorkExperience {
                    employee_id,
                    work_experience_id: row.int("work_experience_id")?,
                    company_name: row.text("organization_name")?,
                    designation: row.text("position")?,
                    start_date: row.date("from_date")?,
                    end_date: row.opt_date("to_date")?,
                    location: row.text("location")?,
                    duration: String::new(),
                }
                .with_duration_at(today))
            })
            .collect::<DbResult<Vec<_>>>()?;
        entries.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(entries)
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn education(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
    ) -> DbResult<Vec<EducationDetails>> {
        let rows = self
            .call(
                tenant,
                Procedure::GetEmployeeEducation,
                &[ProcParam::positional(employee_id)],
            )
            .await?;

        let mut entries = rows
            .iter()
            .map(|row| {
                Ok(EducationDetails {
                    employee_id,
                    education_id: row.int("education_id")?,
                    institution: row.text("institute_name")?,
                    certification: row.text("certification")?,
                    start_date: row.date("from_date")?,
                    end_date: row.opt_date("to_date")?,
                    location: row.text("location")?,
                })
            })
            .collect::<DbResult<Vec<_>>>()?;
        entries.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(entries)
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn languages(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
    ) -> DbResult<Vec<LanguageDetails>> {
        let rows = self
            .call(
                tenant,
                Procedure::GetEmployeeLanguage,
                &[ProcParam::positional(employee_id)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(LanguageDetails {
                    employee_id,
                    language_details_id: row.int("employee_language_id")?,
                    language_id: row.int("language_id")?,
                    language_name: row.text("language_name")?,
                })
            })
            .collect()
    }

    /// Every language an employee can pick from, id to name.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn language_master(&self, tenant: TenantId) -> DbResult<HashMap<i64, String>> {
        let rows = self.call(tenant, Procedure::GetLanguageList, &[]).await?;
        rows.iter()
            .map(|row| Ok((row.int("language_id")?, row.text("language_name")?)))
            .collect()
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn remove_work_experience(
        &self,
        tenant: TenantId,
        work_experience_id: i64,
    ) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::RemoveWorkExperience,
            &[ProcParam::positional(work_experience_id)],
        )
        .await
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn remove_education(&self, tenant: TenantId, education_id: i64) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::RemoveEducation,
            &[ProcParam::positional(education_id)],
        )
        .await
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn remove_language(&self, tenant: TenantId, language_details_id: i64) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::RemoveLanguage,
            &[ProcParam::positional(language_details_id)],
        )
        .await
    }

    /// Only the phone number is editable.
    #[instrument(skip(self, details), fields(tenant = %tenant, employee_id = details.employee_id))]
    pub async fn update_basic_details(
        &self,
        tenant: TenantId,
        details: &BasicEmployeeDetails,
    ) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::UpdateEmployeeBasicDetails,
            &[
                ProcParam::named("empid", details.employee_id),
                ProcParam::named("phoneno", details.phone.as_str()),
            ],
        )
        .await
    }

    #[instrument(skip(self, entry), fields(tenant = %tenant, employee_id = entry.employee_id))]
    pub async fn add_work_experience(&self, tenant: TenantId, entry: &WorkExperience) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::InsertWorkExperience,
            &[
                ProcParam::named("emp_id_ip", entry.employee_id),
                ProcParam::named("organization_name_ip", entry.company_name.as_str()),
                ProcParam::named("position_ip", entry.designation.as_str()),
                ProcParam::named("from_date_ip", entry.start_date),
                ProcParam::named("to_date_ip", entry.end_date),
                ProcParam::named("location_ip", entry.location.as_str()),
            ],
        )
        .await
    }

    #[instrument(skip(self, entry), fields(tenant = %tenant, employee_id = entry.employee_id))]
    pub async fn add_education(&self, tenant: TenantId, entry: &EducationDetails) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::InsertEducation,
            &[
                ProcParam::named("emp_id_ip", entry.employee_id),
                ProcParam::named("institute_name_ip", entry.institution.as_str()),
                ProcParam::named("certification_ip", entry.certification.as_str()),
                ProcParam::named("from_date_ip", entry.start_date),
                ProcParam::named("to_date_ip", entry.end_date),
                ProcParam::named("location_ip", entry.location.as_str()),
            ],
        )
        .await
    }

    #[instrument(skip(self, entry), fields(tenant = %tenant, employee_id = entry.employee_id))]
    pub async fn add_language(&self, tenant: TenantId, entry: &LanguageDetails) -> DbResult<bool> {
        self.mutate(
            tenant,
            Procedure::InsertLanguage,
            &[
                ProcParam::named("emp_id_ip", entry.employee_id),
                ProcParam::named("language_id_ip", entry.language_id),
            ],
        )
        .await
    }
}
