//! Survey response recorder
//!
//! ME and MOOD answers go through `insertMeResponse`, WE ratings through
//! `insertWeResponse`. Every write is timestamped at call time.

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, error, instrument, warn};

use owen_core::{Aggregation, EmployeeId, OwenError, QuestionType, Response, TenantId};

use crate::db::{first_flag, ProcParam, Procedure, ProcedureCaller};
use crate::error::{DbError, DbResult};
use crate::registry::TenantRegistry;

pub struct ResponseRecorder<'a> {
    tenants: &'a TenantRegistry,
    aggregate: Aggregation,
}

impl<'a> ResponseRecorder<'a> {
    pub fn new(tenants: &'a TenantRegistry) -> Self {
        Self::with_aggregation(tenants, Aggregation::default())
    }

    pub fn with_aggregation(tenants: &'a TenantRegistry, aggregate: Aggregation) -> Self {
        Self { tenants, aggregate }
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn save_me_response(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        value: i32,
    ) -> DbResult<bool> {
        let handle = self.tenants.connect(tenant).await?;
        let rows = handle
            .procedures()
            .call(
                Procedure::InsertMeResponse,
                &[
                    ProcParam::named("empid", employee_id),
                    ProcParam::named("queid", question_id),
                    ProcParam::named("responsetime", Utc::now()),
                    ProcParam::named("score", value),
                    ProcParam::named("feedbck", ""),
                ],
            )
            .await?;
        Ok(first_flag(&rows))
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn save_we_response(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        target: EmployeeId,
        value: i32,
    ) -> DbResult<bool> {
        let handle = self.tenants.connect(tenant).await?;
        insert_we(handle.procedures(), employee_id, question_id, target, value).await
    }

    /// Rate several colleagues for one WE question.
    ///
    /// Nothing is written when the employee already answered the question,
    /// and the result is `false`. Otherwise `true` only when at least one
    /// rating was given and every rating was stored.
    #[instrument(skip(self, ratings), fields(tenant = %tenant, ratings = ratings.len()))]
    pub async fn save_we_ratings(
        &self,
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        ratings: &BTreeMap<EmployeeId, i32>,
    ) -> DbResult<bool> {
        let handle = self.tenants.connect(tenant).await?;
        let procedures = handle.procedures();

        let answered = procedures
            .call(
                Procedure::IsWeQuestionAnswered,
                &[
                    ProcParam::named("empid", employee_id),
                    ProcParam::named("queid", question_id),
                ],
            )
            .await?;
        let answered = answered.first().ok_or_else(|| DbError::Procedure {
            procedure: Procedure::IsWeQuestionAnswered.name(),
            reason: "returned no rows".into(),
        })?;
        if answered.flag() {
            warn!(employee_id, question_id, "WE question already answered");
            return Ok(false);
        }

        let mut stored = 0;
        for (target, value) in ratings {
            match insert_we(procedures, employee_id, question_id, *target, *value).await {
                Ok(true) => stored += 1,
                Ok(false) => error!(target = *target, "WE rating was not stored"),
                Err(e) => error!(target = *target, error = %e, "WE rating failed"),
            }
        }
        debug!(stored, requested = ratings.len(), "stored WE ratings");
        Ok(stored > 0 && stored == ratings.len())
    }

    /// Save a mixed batch; each response carries its own tenant.
    ///
    /// Failures are logged per item and folded with the configured
    /// aggregation. An empty batch is `true`.
    #[instrument(skip(self, responses), fields(count = responses.len(), aggregate = ?self.aggregate))]
    pub async fn save_all_responses(&self, responses: &[Response]) -> bool {
        if responses.is_empty() {
            return true;
        }

        let mut any = false;
        let mut all = true;
        for response in responses {
            let saved = match self.save_one(response).await {
                Ok(saved) => saved,
                Err(e) => {
                    error!(
                        tenant = %response.tenant,
                        question_id = response.question_id,
                        error = %e,
                        "response failed"
                    );
                    false
                }
            };
            any |= saved;
            all &= saved;
        }

        match self.aggregate {
            Aggregation::Any => any,
            Aggregation::All => all,
        }
    }

    async fn save_one(&self, response: &Response) -> DbResult<bool> {
        match response.question_type {
            QuestionType::Me | QuestionType::Mood => {
                self.save_me_response(
                    response.tenant,
                    response.employee_id,
                    response.question_id,
                    response.response_value,
                )
                .await
            }
            QuestionType::We => {
                let target = response.target_employee.ok_or_else(|| {
                    OwenError::missing_field(
                        "target_employee",
                        format!("WE response to question {}", response.question_id),
                    )
                })?;
                self.save_we_response(
                    response.tenant,
                    response.employee_id,
                    response.question_id,
                    target,
                    response.response_value,
                )
                .await
            }
        }
    }
}

async fn insert_we(
    procedures: &dyn ProcedureCaller,
    employee_id: EmployeeId,
    question_id: i64,
    target: EmployeeId,
    value: i32,
) -> DbResult<bool> {
    let rows = procedures
        .call(
            Procedure::InsertWeResponse,
            &[
                ProcParam::named("empid", employee_id),
                ProcParam::named("queid", question_id),
                ProcParam::named("responsetime", Utc::now()),
                ProcParam::named("targetid", target),
                ProcParam::named("wt", value),
            ],
        )
        .await?;
    Ok(first_flag(&rows))
}
