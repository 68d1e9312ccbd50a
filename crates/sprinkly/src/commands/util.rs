//! Shared helpers for command handlers.

use sprinkly_core::{Controller, Program, Station};

use crate::error::CliError;

/// Look up a station by index, honouring the profile's station allow-list.
pub async fn find_station(controller: &Controller, index: usize) -> Result<Station, CliError> {
    let not_found = || CliError::NotFound {
        resource_type: "station".into(),
        identifier: index.to_string(),
        list_command: "stations list".into(),
    };
    if !controller.config().stations.permits(index) {
        return Err(not_found());
    }
    controller
        .stations()
        .await?
        .into_iter()
        .find(|s| s.index() == index)
        .ok_or_else(not_found)
}

/// Look up a program by index, honouring the profile's program allow-list.
pub async fn find_program(controller: &Controller, index: usize) -> Result<Program, CliError> {
    let not_found = || CliError::NotFound {
        resource_type: "program".into(),
        identifier: index.to_string(),
        list_command: "programs list".into(),
    };
    if !controller.config().programs.permits(index) {
        return Err(not_found());
    }
    controller
        .programs()
        .await?
        .into_iter()
        .find(|p| p.index() == index)
        .ok_or_else(not_found)
}

/// Format a duration in seconds as `1h02m03s` / `4m05s` / `6s`.
pub fn format_secs(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m:02}m{s:02}s")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(format_secs(6), "6s");
        assert_eq!(format_secs(245), "4m05s");
        assert_eq!(format_secs(3723), "1h02m03s");
    }
}
