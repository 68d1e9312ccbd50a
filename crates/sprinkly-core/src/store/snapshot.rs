// ── Immutable device snapshot ──
//
// One refresh cycle's worth of device state. Built whole from a single
// `/ja` response and never mutated, so every field read from one snapshot
// belongs to the same cycle.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use sprinkly_api::AllData;

use crate::error::CoreError;
use crate::model::readings::epoch;

/// The three logical sections of device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    /// Device-wide status (`sn`).
    Status,
    /// Controller settings (`en`, `rd`, `rdst`, `rs`, `lrun`, `ps`).
    Settings,
    /// Options (`wl`).
    Options,
}

/// State from one successful refresh.
#[derive(Debug, Clone)]
pub struct DeviceSnapshot {
    status: Map<String, Value>,
    settings: Map<String, Value>,
    options: Map<String, Value>,
    fetched_at: DateTime<Utc>,
    received: Instant,
}

impl DeviceSnapshot {
    pub fn new(data: AllData, fetched_at: DateTime<Utc>) -> Self {
        Self {
            status: data.status,
            settings: data.settings,
            options: data.options,
            fetched_at,
            received: Instant::now(),
        }
    }

    /// When the data was fetched from the device.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Time since the snapshot was built, on the monotonic clock.
    pub fn age(&self) -> Duration {
        self.received.elapsed()
    }

    pub fn section(&self, section: Section) -> &Map<String, Value> {
        match section {
            Section::Status => &self.status,
            Section::Settings => &self.settings,
            Section::Options => &self.options,
        }
    }

    /// Raw JSON value of one field.
    pub fn raw(&self, section: Section, field: &str) -> Option<&Value> {
        self.section(section).get(field)
    }

    /// Decode one field.
    pub fn field<T: DeserializeOwned>(&self, section: Section, field: &str) -> Result<T, CoreError> {
        let value = self
            .raw(section, field)
            .ok_or_else(|| CoreError::missing(section, field))?;
        decode(value, section, field)
    }

    /// Decode an integer field as an on/off flag.
    pub fn flag(&self, section: Section, field: &str) -> Result<bool, CoreError> {
        Ok(self.field::<i64>(section, field)? != 0)
    }

    /// Decode an epoch-seconds field; 0 means unset.
    pub fn time(&self, section: Section, field: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
        Ok(epoch(self.field(section, field)?))
    }

    /// Decode one element of an array field, e.g. `sn[3]`.
    pub fn element<T: DeserializeOwned>(
        &self,
        section: Section,
        field: &str,
        index: usize,
    ) -> Result<T, CoreError> {
        let array = self
            .raw(section, field)
            .ok_or_else(|| CoreError::missing(section, field))?
            .as_array()
            .ok_or_else(|| CoreError::Decode {
                message: format!("{section}.{field} is not an array"),
            })?;
        let label = format!("{field}[{index}]");
        let value = array
            .get(index)
            .ok_or_else(|| CoreError::missing(section, label.clone()))?;
        decode(value, section, &label)
    }
}

fn decode<T: DeserializeOwned>(value: &Value, section: Section, field: &str) -> Result<T, CoreError> {
    T::deserialize(value).map_err(|e| CoreError::Decode {
        message: format!("{section}.{field}: {e}"),
    })
}
