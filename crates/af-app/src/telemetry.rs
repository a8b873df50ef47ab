//! Per-cycle telemetry log.
//!
//! One JSON record per control cycle, appended to a `.jsonl` file so a
//! run can be inspected or plotted afterwards. Logging is optional and
//! best-effort: a failed append is reported to the caller but never
//! interrupts the loop.

use crate::error::AppResult;
use af_controls::ActuatorCommand;
use af_state::CfdState;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct CycleRecord<'a> {
    recorded_at: String,
    state: &'a CfdState,
    command: &'a ActuatorCommand,
}

/// Append-only jsonl log of executed cycles.
#[derive(Debug, Clone)]
pub struct CycleLog {
    path: PathBuf,
}

impl CycleLog {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, "")?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one cycle record.
    pub fn append(&self, state: &CfdState, command: &ActuatorCommand) -> AppResult<()> {
        let record = CycleRecord {
            recorded_at: chrono::Utc::now().to_rfc3339(),
            state,
            command,
        };
        let line = serde_json::to_string(&record).map_err(std::io::Error::other)?;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_append_as_json_lines() {
        let path = std::env::temp_dir().join(format!(
            "af_cycle_log_{}_{}.jsonl",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let log = CycleLog::create(&path).unwrap();
        let state = CfdState::default();
        let command = ActuatorCommand::neutral(0.0);
        log.append(&state, &command).unwrap();
        log.append(&state, &command).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert!(parsed["recorded_at"].is_string());
        assert_eq!(parsed["command"]["deflections_deg"][0], 0.0);

        let _ = fs::remove_file(&path);
    }
}
