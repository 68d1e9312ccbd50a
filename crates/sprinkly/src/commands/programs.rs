//! Program command handlers.

use serde::Serialize;
use tabled::Tabled;

use sprinkly_core::Controller;

use crate::cli::{GlobalOpts, ProgramsArgs, ProgramsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize, Tabled)]
struct ProgramRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ProgramsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProgramsCommand::List => {
            let filter = &controller.config().programs;
            let rows: Vec<ProgramRow> = controller
                .programs()
                .await?
                .iter()
                .filter(|p| filter.permits(p.index()))
                .map(|p| ProgramRow {
                    index: p.index(),
                    name: p.name().to_owned(),
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &rows,
                |p| ProgramRow {
                    index: p.index,
                    name: p.name.clone(),
                },
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProgramsCommand::Run { index } => {
            let program = util::find_program(controller, index).await?;
            program.activate().await?;
            if !global.quiet {
                eprintln!("Program '{}' started", program.name());
            }
            Ok(())
        }
    }
}
