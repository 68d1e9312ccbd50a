//! Station command handlers.

use serde::Serialize;
use tabled::Tabled;

use sprinkly_core::{Controller, Station};

use crate::cli::{GlobalOpts, StationsArgs, StationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── View ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StationView {
    index: usize,
    name: String,
    on: bool,
    program_id: u32,
    remaining_secs: u64,
}

impl StationView {
    async fn fetch(station: &Station) -> Result<Self, CliError> {
        let program = station.program_status().await?;
        Ok(Self {
            index: station.index(),
            name: station.name().to_owned(),
            on: station.status().await?,
            program_id: program.program_id,
            remaining_secs: program.remaining_secs,
        })
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

impl StationRow {
    fn new(s: &StationView, color: bool) -> Self {
        let running = s.program_id != 0;
        Self {
            index: s.index,
            name: s.name.clone(),
            state: output::on_off(s.on, color),
            program: if running { s.program_id.to_string() } else { "-".into() },
            remaining: if running {
                util::format_secs(s.remaining_secs)
            } else {
                "-".into()
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: StationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StationsCommand::List => {
            let filter = &controller.config().stations;
            let mut views = Vec::new();
            for station in controller.stations().await? {
                if filter.permits(station.index()) {
                    views.push(StationView::fetch(&station).await?);
                }
            }
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &views,
                |s| StationRow::new(s, color),
                |s| s.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StationsCommand::On { index, minutes } => {
            let station = util::find_station(controller, index).await?;
            station.turn_on(minutes).await?;
            if !global.quiet {
                eprintln!("Station '{}' on for {minutes} min", station.name());
            }
            Ok(())
        }

        StationsCommand::Off { index } => {
            let station = util::find_station(controller, index).await?;
            station.turn_off().await?;
            if !global.quiet {
                eprintln!("Station '{}' off", station.name());
            }
            Ok(())
        }
    }
}
