//! Employee profile records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::work_duration;

pub type EmployeeId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicEmployeeDetails {
    pub employee_id: EmployeeId,
    pub company_employee_id: String,
    pub dob: Option<NaiveDate>,
    pub email_id: String,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub function: String,
    pub location: String,
    pub designation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub employee_id: EmployeeId,
    pub work_experience_id: i64,
    pub company_name: String,
    pub designation: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub location: String,
    /// `"<Y>years <M>months"` for open-ended entries, empty otherwise
    pub duration: String,
}

impl WorkExperience {
    /// Fill in `duration` as of `today`.
    pub fn with_duration_at(mut self, today: NaiveDate) -> Self {
        self.duration = match self.end_date {
            None => work_duration(self.start_date, today),
            Some(_) => String::new(),
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationDetails {
    pub employee_id: EmployeeId,
    pub education_id: i64,
    pub institution: String,
    pub certification: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDetails {
    pub employee_id: EmployeeId,
    pub language_details_id: i64,
    pub language_id: i64,
    pub language_name: String,
}
