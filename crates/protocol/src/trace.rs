use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    /// The stage answered the request; later stages do not run
    ShortCircuit,
    /// The stage failed or had nothing to do; the pipeline carried on
    Skipped,
}

/// Audit record appended once per stage per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTrace {
    pub stage: String,
    pub status: StepStatus,
    pub note: String,
    pub at_ms: u64,
}

impl StepTrace {
    #[must_use]
    pub fn new(stage: impl Into<String>, status: StepStatus, note: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            status,
            note: note.into(),
            at_ms: unix_ms_now(),
        }
    }
}

#[must_use]
pub fn unix_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
