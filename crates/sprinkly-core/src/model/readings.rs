// ── Typed readings ──
//
// Array-shaped fields from the settings section, decoded into named
// structs. The firmware reports times as epoch seconds with 0 meaning
// "not set".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) fn epoch(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        None
    } else {
        DateTime::from_timestamp(secs, 0)
    }
}

fn non_negative<T: TryFrom<i64>>(value: i64, what: &str) -> Result<T, String> {
    T::try_from(value).map_err(|_| format!("{what} out of range: {value}"))
}

/// Last completed station run (`settings.lrun`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub struct LastRun {
    /// Station index.
    pub station: u32,
    /// Program id that ran it (0 = none, 99 = manual, 254 = run-once).
    pub program: u32,
    pub duration_secs: u64,
    pub end_time: Option<DateTime<Utc>>,
}

impl TryFrom<Vec<i64>> for LastRun {
    type Error = String;

    fn try_from(raw: Vec<i64>) -> Result<Self, Self::Error> {
        let [station, program, duration, end] = raw[..] else {
            return Err(format!("expected 4 elements in lrun, got {}", raw.len()));
        };
        Ok(Self {
            station: non_negative(station, "station")?,
            program: non_negative(program, "program")?,
            duration_secs: non_negative(duration, "duration")?,
            end_time: epoch(end),
        })
    }
}

/// Program state of one station (`settings.ps[index]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub struct ProgramStatus {
    /// Program id scheduled on the station; 0 when idle.
    pub program_id: u32,
    /// Seconds left in the current run.
    pub remaining_secs: u64,
    pub start_time: Option<DateTime<Utc>>,
}

impl ProgramStatus {
    pub fn is_running(&self) -> bool {
        self.program_id != 0
    }
}

impl TryFrom<Vec<i64>> for ProgramStatus {
    type Error = String;

    fn try_from(raw: Vec<i64>) -> Result<Self, Self::Error> {
        // Older firmware omits the start time.
        let (pid, remaining, start) = match raw[..] {
            [pid, remaining, start, ..] => (pid, remaining, start),
            [pid, remaining] => (pid, remaining, 0),
            _ => return Err(format!("expected at least 2 elements in ps, got {}", raw.len())),
        };
        Ok(Self {
            program_id: non_negative(pid, "program id")?,
            remaining_secs: non_negative(remaining, "remaining time")?,
            start_time: epoch(start),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_run_decodes_positional_array() {
        let run: LastRun = serde_json::from_value(json!([1, 2, 600, 1_700_000_000])).unwrap();
        assert_eq!(run.station, 1);
        assert_eq!(run.program, 2);
        assert_eq!(run.duration_secs, 600);
        assert_eq!(run.end_time.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn last_run_rejects_wrong_arity() {
        assert!(serde_json::from_value::<LastRun>(json!([1, 2, 600])).is_err());
    }

    #[test]
    fn idle_station_has_no_program() {
        let status: ProgramStatus = serde_json::from_value(json!([0, 0, 0])).unwrap();
        assert!(!status.is_running());
        assert_eq!(status.start_time, None);
    }

    #[test]
    fn running_station_reports_program() {
        let status: ProgramStatus = serde_json::from_value(json!([3, 120, 1_700_000_100])).unwrap();
        assert!(status.is_running());
        assert_eq!(status.remaining_secs, 120);
        assert_eq!(status.start_time.unwrap().timestamp(), 1_700_000_100);
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(serde_json::from_value::<ProgramStatus>(json!([-1, 0, 0])).is_err());
    }
}
