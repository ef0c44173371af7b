//! Per-operation async status tracking.

use serde::Serialize;
use std::collections::HashMap;

/// The asynchronous operations the store runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenOp {
    FetchBalance,
    FetchTransactions,
    Transfer,
    CreateEscrow,
    ReleaseEscrow,
}

/// Lifecycle of one operation kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OpStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Clone, Debug, Default)]
struct OpState {
    status: OpStatus,
    error: Option<String>,
}

/// Status and error slot per operation kind.
///
/// Each operation carries its own indicator, so a pending transfer never
/// hides a pending balance fetch (and vice versa).
#[derive(Debug, Default)]
pub struct StatusMap {
    ops: HashMap<TokenOp, OpState>,
}

impl StatusMap {
    pub fn status(&self, op: TokenOp) -> OpStatus {
        self.ops.get(&op).map(|s| s.status).unwrap_or_default()
    }

    pub fn error(&self, op: TokenOp) -> Option<&str> {
        self.ops.get(&op).and_then(|s| s.error.as_deref())
    }

    /// Mark `op` pending and clear its previous error.
    pub fn begin(&mut self, op: TokenOp) {
        let state = self.ops.entry(op).or_default();
        state.status = OpStatus::Pending;
        state.error = None;
    }

    pub fn fulfill(&mut self, op: TokenOp) {
        let state = self.ops.entry(op).or_default();
        state.status = OpStatus::Fulfilled;
        state.error = None;
    }

    pub fn reject(&mut self, op: TokenOp, message: impl Into<String>) {
        let state = self.ops.entry(op).or_default();
        state.status = OpStatus::Rejected;
        state.error = Some(message.into());
    }

    pub fn clear_error(&mut self, op: TokenOp) {
        if let Some(state) = self.ops.get_mut(&op) {
            state.error = None;
        }
    }
}
