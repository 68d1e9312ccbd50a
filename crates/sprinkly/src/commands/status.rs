//! Status command handler.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sprinkly_core::{Controller, DeviceSnapshot, LastRun, Section};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

// ── View ────────────────────────────────────────────────────────────

/// Controller-wide readings, all taken from the same cached snapshot.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub host: String,
    pub water_level: u32,
    pub enabled: bool,
    pub rain_delay: bool,
    pub rain_delay_until: Option<DateTime<Utc>>,
    pub rain_sensor: bool,
    pub last_run: LastRun,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl StatusView {
    pub async fn fetch(controller: &Controller) -> Result<Self, CliError> {
        let snap = controller.snapshot().await.ok_or_else(|| CliError::DeviceData {
            message: "no data received from device yet".into(),
        })?;
        Self::from_snapshot(controller.host(), &snap)
    }

    fn from_snapshot(host: &str, snap: &DeviceSnapshot) -> Result<Self, CliError> {
        Ok(Self {
            host: host.to_owned(),
            water_level: snap.field(Section::Options, "wl")?,
            enabled: snap.flag(Section::Settings, "en")?,
            rain_delay: snap.flag(Section::Settings, "rd")?,
            rain_delay_until: snap.time(Section::Settings, "rdst")?,
            rain_sensor: snap.flag(Section::Settings, "rs")?,
            last_run: snap.field(Section::Settings, "lrun")?,
            fetched_at: Some(snap.fetched_at()),
        })
    }
}

fn fmt_time(t: Option<DateTime<Utc>>) -> String {
    t.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

pub fn detail(s: &StatusView, color: bool) -> String {
    let delay = if s.rain_delay {
        format!("active until {}", fmt_time(s.rain_delay_until))
    } else {
        "none".into()
    };
    let last_run = if s.last_run.end_time.is_some() {
        format!(
            "station {} ({} via program {}) ended {}",
            s.last_run.station,
            util::format_secs(s.last_run.duration_secs),
            s.last_run.program,
            fmt_time(s.last_run.end_time),
        )
    } else {
        "-".into()
    };
    let enabled = if s.enabled { "yes" } else { "no" };
    let sensor = if s.rain_sensor { "rain detected" } else { "dry" };
    [
        format!("Host:        {}", s.host),
        format!("Enabled:     {}", output::alert(enabled, !s.enabled, color)),
        format!("Water level: {}%", s.water_level),
        format!("Rain delay:  {}", output::alert(&delay, s.rain_delay, color)),
        format!("Rain sensor: {}", output::alert(sensor, s.rain_sensor, color)),
        format!("Last run:    {last_run}"),
        format!("Fetched at:  {}", fmt_time(s.fetched_at)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    // One-shot invocation: report an unreachable device instead of missing data.
    controller.refresh().await?;
    let view = StatusView::fetch(controller).await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |s| detail(s, color),
        |s| s.water_level.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
