//! Stored-procedure seam
//!
//! Every relational operation in owen is a call to a named stored procedure.
//! Repositories speak in [`Procedure`], [`ProcParam`] and [`ProcRow`]; the
//! Postgres implementation renders the call as
//! `SELECT * FROM "name"(param => $1, ...)` and converts result columns by
//! their database type.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row, TypeInfo};

use crate::error::{DbError, DbResult};

/// Stored procedures owen calls. Names are fixed, never built from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    GetEmployeeBasicDetails,
    GetEmployeeWorkExperience,
    GetEmployeeEducation,
    GetEmployeeLanguage,
    GetLanguageList,
    RemoveWorkExperience,
    RemoveEducation,
    RemoveLanguage,
    UpdateEmployeeBasicDetails,
    InsertWorkExperience,
    InsertEducation,
    InsertLanguage,
    InsertInitiativeMetricValue,
    GetInitiativeTypeList,
    InsertMeResponse,
    InsertWeResponse,
    IsWeQuestionAnswered,
}

impl Procedure {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetEmployeeBasicDetails => "getEmployeeBasicDetails",
            Self::GetEmployeeWorkExperience => "getEmployeeWorkExperience",
            Self::GetEmployeeEducation => "getEmployeeEducation",
            Self::GetEmployeeLanguage => "getEmployeeLanguage",
            Self::GetLanguageList => "getLanguageList",
            Self::RemoveWorkExperience => "removeWorkExperience",
            Self::RemoveEducation => "removeEducation",
            Self::RemoveLanguage => "removeLanguage",
            Self::UpdateEmployeeBasicDetails => "updateEmployeeBasicDetails",
            Self::InsertWorkExperience => "insertWorkExperience",
            Self::InsertEducation => "insertEducation",
            Self::InsertLanguage => "insertLanguage",
            Self::InsertInitiativeMetricValue => "insertInitiativeMetricValue",
            Self::GetInitiativeTypeList => "getInitiativeTypeList",
            Self::InsertMeResponse => "insertMeResponse",
            Self::InsertWeResponse => "insertWeResponse",
            Self::IsWeQuestionAnswered => "isWeQuestionAnswered",
        }
    }
}

/// Argument value bound to a procedure parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ProcArg {
    Int(i64),
    Text(Option<String>),
    Date(Option<NaiveDate>),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for ProcArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ProcArg {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for ProcArg {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_owned()))
    }
}

impl From<String> for ProcArg {
    fn from(v: String) -> Self {
        Self::Text(Some(v))
    }
}

impl From<NaiveDate> for ProcArg {
    fn from(v: NaiveDate) -> Self {
        Self::Date(Some(v))
    }
}

impl From<Option<NaiveDate>> for ProcArg {
    fn from(v: Option<NaiveDate>) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for ProcArg {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

/// A positional or named procedure parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ProcParam {
    pub name: Option<&'static str>,
    pub value: ProcArg,
}

impl ProcParam {
    pub fn positional(value: impl Into<ProcArg>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    pub fn named(name: &'static str, value: impl Into<ProcArg>) -> Self {
        Self {
            name: Some(name),
            value: value.into(),
        }
    }
}

/// Column value read back from a procedure result
#[derive(Debug, Clone, PartialEq)]
pub enum ProcValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

/// One result row, columns in result order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcRow {
    columns: Vec<(String, ProcValue)>,
}

impl ProcRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: ProcValue) -> Self {
        self.columns.push((column.into(), value));
        self
    }

    /// Look a column up by name, ignoring case (Postgres folds unquoted names).
    pub fn value(&self, column: &str) -> Option<&ProcValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    /// Column by 1-based position, like JDBC-style result sets.
    pub fn value_at(&self, position: usize) -> Option<&ProcValue> {
        position
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx))
            .map(|(_, value)| value)
    }

    fn require(&self, column: &str) -> DbResult<&ProcValue> {
        self.value(column)
            .ok_or_else(|| DbError::column(column, "missing from result"))
    }

    fn require_at(&self, position: usize) -> DbResult<&ProcValue> {
        self.value_at(position)
            .ok_or_else(|| DbError::column(format!("#{}", position), "missing from result"))
    }

    pub fn int(&self, column: &str) -> DbResult<i64> {
        as_int(column, self.require(column)?)
    }

    pub fn int_at(&self, position: usize) -> DbResult<i64> {
        as_int(&format!("#{}", position), self.require_at(position)?)
    }

    /// Text column; NULL reads as an empty string.
    pub fn text(&self, column: &str) -> DbResult<String> {
        as_text(column, self.require(column)?)
    }

    pub fn text_at(&self, position: usize) -> DbResult<String> {
        as_text(&format!("#{}", position), self.require_at(position)?)
    }

    pub fn opt_date(&self, column: &str) -> DbResult<Option<NaiveDate>> {
        match self.require(column)? {
            ProcValue::Null => Ok(None),
            ProcValue::Date(d) => Ok(Some(*d)),
            ProcValue::Timestamp(ts) => Ok(Some(ts.date_naive())),
            other => Err(DbError::column(column, format!("expected date, got {:?}", other))),
        }
    }

    pub fn date(&self, column: &str) -> DbResult<NaiveDate> {
        self.opt_date(column)?
            .ok_or_else(|| DbError::column(column, "unexpected NULL"))
    }

    /// Success flag of a mutating procedure.
    ///
    /// The `op` column if present, otherwise the first boolean column. Without
    /// a boolean column an integer first column is read as a flag (non-zero is
    /// success); any other row counts as success.
    pub fn flag(&self) -> bool {
        if let Some(ProcValue::Bool(op)) = self.value("op") {
            return *op;
        }
        let boolean = self.columns.iter().find_map(|(_, value)| match value {
            ProcValue::Bool(b) => Some(*b),
            _ => None,
        });
        match (boolean, self.columns.first()) {
            (Some(b), _) => b,
            (None, Some((_, ProcValue::Int(v)))) => *v != 0,
            (None, _) => true,
        }
    }
}

fn as_int(column: &str, value: &ProcValue) -> DbResult<i64> {
    match value {
        ProcValue::Int(v) => Ok(*v),
        other => Err(DbError::column(column, format!("expected integer, got {:?}", other))),
    }
}

fn as_text(column: &str, value: &ProcValue) -> DbResult<String> {
    match value {
        ProcValue::Null => Ok(String::new()),
        ProcValue::Text(s) => Ok(s.clone()),
        ProcValue::Int(v) => Ok(v.to_string()),
        other => Err(DbError::column(column, format!("expected text, got {:?}", other))),
    }
}

/// Success flag of a mutating call: first row's flag, no row is failure.
pub fn first_flag(rows: &[ProcRow]) -> bool {
    rows.first().map(ProcRow::flag).unwrap_or(false)
}

/// Anything that can execute owen's stored procedures
#[async_trait]
pub trait ProcedureCaller: Send + Sync {
    async fn call(&self, procedure: Procedure, params: &[ProcParam]) -> DbResult<Vec<ProcRow>>;
}

/// Render the SQL that invokes `procedure` with `params`.
pub fn call_sql(procedure: Procedure, params: &[ProcParam]) -> String {
    let args: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, param)| match param.name {
            Some(name) => format!("{} => ${}", name, i + 1),
            None => format!("${}", i + 1),
        })
        .collect();

    format!("SELECT * FROM \"{}\"({})", procedure.name(), args.join(", "))
}

/// Stored procedures on a tenant's Postgres pool
#[derive(Clone)]
pub struct PgProcedures {
    pool: PgPool,
}

impl PgProcedures {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProcedureCaller for PgProcedures {
    async fn call(&self, procedure: Procedure, params: &[ProcParam]) -> DbResult<Vec<ProcRow>> {
        let sql = call_sql(procedure, params);
        tracing::debug!(procedure = procedure.name(), %sql, "calling stored procedure");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match &param.value {
                ProcArg::Int(v) => {
                    // procedure parameters are declared as integer
                    let v = i32::try_from(*v).map_err(|_| DbError::Procedure {
                        procedure: procedure.name(),
                        reason: format!("argument {} does not fit an integer parameter", v),
                    })?;
                    query.bind(v)
                }
                ProcArg::Text(v) => query.bind(v.clone()),
                ProcArg::Date(v) => query.bind(*v),
                ProcArg::Timestamp(v) => query.bind(*v),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(convert_row).collect()
    }
}

fn convert_row(row: &PgRow) -> DbResult<ProcRow> {
    let mut out = ProcRow::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value = match column.type_info().name() {
            "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(ProcValue::Bool),
            "INT2" => row
                .try_get::<Option<i16>, _>(idx)?
                .map(|v| ProcValue::Int(i64::from(v))),
            "INT4" => row
                .try_get::<Option<i32>, _>(idx)?
                .map(|v| ProcValue::Int(i64::from(v))),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(ProcValue::Int),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(idx)?
                .map(|v| ProcValue::Float(f64::from(v))),
            "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(ProcValue::Float),
            "DATE" => row.try_get::<Option<NaiveDate>, _>(idx)?.map(ProcValue::Date),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(idx)?
                .map(ProcValue::Timestamp),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(|v| ProcValue::Timestamp(v.and_utc())),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(idx)?.map(ProcValue::Text)
            }
            other => {
                return Err(DbError::column(
                    name,
                    format!("unsupported column type {}", other),
                ))
            }
        };
        out = out.with(name, value.unwrap_or(ProcValue::Null));
    }
    Ok(out)
}
