//! Scripted `ProcedureCaller`: canned rows per procedure, every call recorded

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use owen_store::db::{ProcArg, ProcParam, ProcRow, ProcValue, Procedure, ProcedureCaller};
use owen_store::{DbError, DbResult};

type Outcome = Result<Vec<ProcRow>, String>;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub procedure: Procedure,
    pub params: Vec<ProcParam>,
}

impl RecordedCall {
    pub fn arg(&self, name: &str) -> Option<&ProcArg> {
        self.params
            .iter()
            .find(|p| p.name == Some(name))
            .map(|p| &p.value)
    }
}

/// Unscripted procedures return no rows.
#[derive(Default)]
pub struct ScriptedProcedures {
    once: Mutex<HashMap<Procedure, VecDeque<Outcome>>>,
    always: Mutex<HashMap<Procedure, Outcome>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProcedures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, procedure: Procedure, rows: Vec<ProcRow>) {
        self.always.lock().unwrap().insert(procedure, Ok(rows));
    }

    /// Used before the standing response, in order.
    pub fn respond_once(&self, procedure: Procedure, rows: Vec<ProcRow>) {
        self.once
            .lock()
            .unwrap()
            .entry(procedure)
            .or_default()
            .push_back(Ok(rows));
    }

    pub fn fail(&self, procedure: Procedure, reason: &str) {
        self.always
            .lock()
            .unwrap()
            .insert(procedure, Err(reason.to_string()));
    }

    pub fn fail_once(&self, procedure: Procedure, reason: &str) {
        self.once
            .lock()
            .unwrap()
            .entry(procedure)
            .or_default()
            .push_back(Err(reason.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, procedure: Procedure) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.procedure == procedure)
            .collect()
    }
}

#[async_trait]
impl ProcedureCaller for ScriptedProcedures {
    async fn call(&self, procedure: Procedure, params: &[ProcParam]) -> DbResult<Vec<ProcRow>> {
        self.calls.lock().unwrap().push(RecordedCall {
            procedure,
            params: params.to_vec(),
        });

        let queued = self
            .once
            .lock()
            .unwrap()
            .get_mut(&procedure)
            .and_then(VecDeque::pop_front);
        let outcome = match queued {
            Some(outcome) => outcome,
            None => self
                .always
                .lock()
                .unwrap()
                .get(&procedure)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new())),
        };

        outcome.map_err(|reason| DbError::Procedure {
            procedure: procedure.name(),
            reason,
        })
    }
}

/// Single-row `op` result of a mutating procedure.
pub fn op(ok: bool) -> Vec<ProcRow> {
    vec![ProcRow::new().with("op", ProcValue::Bool(ok))]
}

pub fn text(value: &str) -> ProcValue {
    ProcValue::Text(value.to_string())
}
