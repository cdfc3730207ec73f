//! Survey responses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::employee::EmployeeId;
use super::tenant::TenantId;
use crate::error::OwenError;

/// ME and MOOD are self-assessment, WE rates a colleague
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    Me,
    We,
    Mood,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Me => "ME",
            Self::We => "WE",
            Self::Mood => "MOOD",
        }
    }
}

impl FromStr for QuestionType {
    type Err = OwenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ME" => Ok(Self::Me),
            "WE" => Ok(Self::We),
            "MOOD" => Ok(Self::Mood),
            _ => Err(OwenError::invalid_variant("question type", s)),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answer to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub tenant: TenantId,
    pub employee_id: EmployeeId,
    pub question_id: i64,
    pub question_type: QuestionType,
    pub response_value: i32,
    /// Rated colleague, WE questions only
    pub target_employee: Option<EmployeeId>,
}

impl Response {
    pub fn me(tenant: TenantId, employee_id: EmployeeId, question_id: i64, value: i32) -> Self {
        Self {
            tenant,
            employee_id,
            question_id,
            question_type: QuestionType::Me,
            response_value: value,
            target_employee: None,
        }
    }

    pub fn mood(tenant: TenantId, employee_id: EmployeeId, question_id: i64, value: i32) -> Self {
        Self {
            question_type: QuestionType::Mood,
            ..Self::me(tenant, employee_id, question_id, value)
        }
    }

    pub fn we(
        tenant: TenantId,
        employee_id: EmployeeId,
        question_id: i64,
        target: EmployeeId,
        value: i32,
    ) -> Self {
        Self {
            tenant,
            employee_id,
            question_id,
            question_type: QuestionType::We,
            response_value: value,
            target_employee: Some(target),
        }
    }
}
