// Wire types for the device JSON API.
//
// Kept deliberately loose: the field set of each section varies by
// firmware revision, so sections are carried as JSON maps and the core
// projects the fields it needs.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Position of the display name within a raw program definition.
pub const PROGRAM_NAME_FIELD: usize = 5;

/// `GET /ja` -- everything the device knows, in one round trip.
///
/// Only the three sections the cache consumes are decoded; `programs`
/// and `stations` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AllData {
    /// Device-wide status (`sn`: per-station on/off).
    pub status: Map<String, Value>,
    /// Controller settings (`en`, `rd`, `rdst`, `rs`, `lrun`, `ps`, ...).
    pub settings: Map<String, Value>,
    /// Options (`wl` water level, ...).
    pub options: Map<String, Value>,
}

/// `GET /jn` -- station names in index order.
#[derive(Debug, Clone, Deserialize)]
pub struct StationNames {
    pub snames: Vec<String>,
}

/// `GET /jp` -- program definitions in index order.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramData {
    pub pd: Vec<RawProgram>,
}

/// One program definition: `[flag, days0, days1, starts, durations, name, ...]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawProgram(pub Vec<Value>);

impl RawProgram {
    /// The program's display name, if the definition carries one.
    pub fn name(&self) -> Option<&str> {
        self.0.get(PROGRAM_NAME_FIELD).and_then(Value::as_str)
    }
}

/// Body returned by command endpoints (`/cm`, `/mp`).
#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    pub result: i64,
}

/// Firmware result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    Unauthorized,
    Mismatch,
    DataMissing,
    OutOfRange,
    DataFormatError,
    PageNotFound,
    NotPermitted,
    Other(i64),
}

impl From<i64> for ResultCode {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Success,
            2 => Self::Unauthorized,
            3 => Self::Mismatch,
            16 => Self::DataMissing,
            17 => Self::OutOfRange,
            18 => Self::DataFormatError,
            32 => Self::PageNotFound,
            48 => Self::NotPermitted,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::Mismatch => f.write_str("mismatch"),
            Self::DataMissing => f.write_str("data missing"),
            Self::OutOfRange => f.write_str("out of range"),
            Self::DataFormatError => f.write_str("data format error"),
            Self::PageNotFound => f.write_str("page not found"),
            Self::NotPermitted => f.write_str("not permitted"),
            Self::Other(code) => write!(f, "result {code}"),
        }
    }
}
