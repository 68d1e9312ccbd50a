//! Watch command handler: the polling caller.
//!
//! Polls controller status on a fixed tick. Reads go through the shared
//! cache, so a tick shorter than the refresh interval reuses the last
//! snapshot instead of querying the device.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use sprinkly_core::Controller;

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::status::StatusView;
use super::util;

fn line(view: &StatusView, age: Option<Duration>, color: bool) -> String {
    let now = chrono::Local::now().format("%H:%M:%S");
    let delay = output::alert(
        if view.rain_delay { "rain delay" } else { "no delay" },
        view.rain_delay,
        color,
    );
    let sensor = output::alert(
        if view.rain_sensor { "raining" } else { "dry" },
        view.rain_sensor,
        color,
    );
    let age = age.map_or_else(|| "-".into(), |a| util::format_secs(a.as_secs()));
    format!(
        "{now}  water {:>3}%  {delay}  {sensor}  data age {age}",
        view.water_level
    )
}

pub async fn handle(
    controller: &Controller,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.every == 0 {
        return Err(CliError::Validation {
            field: "every".into(),
            reason: "poll interval must be at least 1 second".into(),
        });
    }

    let color = output::should_color(&global.color);
    let mut ticker = tokio::time::interval(Duration::from_secs(args.every));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polls = 0u32;
    let mut first_error = None;
    let mut succeeded = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let outcome = controller.ensure_fresh().await;
        debug!(?outcome, poll = polls, "tick");

        match StatusView::fetch(controller).await {
            Ok(view) => {
                let out = match global.output {
                    OutputFormat::Table => line(&view, controller.data_age(), color),
                    // One document per line for json, so the stream stays parseable.
                    OutputFormat::Json | OutputFormat::JsonCompact => output::render_single(
                        &OutputFormat::JsonCompact,
                        &view,
                        |_| String::new(),
                        |_| String::new(),
                    )?,
                    ref other => output::render_single(
                        other,
                        &view,
                        |_| String::new(),
                        |v| v.water_level.to_string(),
                    )?,
                };
                output::print_output(&out, global.quiet);
                succeeded = true;
            }
            Err(err) => {
                warn!(error = %err, "no status available yet");
                first_error.get_or_insert(err);
            }
        }

        polls += 1;
        if args.count.is_some_and(|n| polls >= n) {
            break;
        }
    }

    // A bounded watch that never saw data failed.
    match first_error {
        Some(err) if !succeeded => Err(err),
        _ => Ok(()),
    }
}
