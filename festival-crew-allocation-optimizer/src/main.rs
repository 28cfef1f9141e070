use core::fmt::{self, Debug, Display};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use festival_crew_allocation_config::{get_config, ConfigError};
use festival_crew_allocation_optimizer::{
    run_auto_assignment_with_progress, AllocationError, Crew, Roster, Volunteer,
};
use festival_crew_allocation_telemetry::{setup_telemetry, TelemetryError};
use serde::Deserialize;
use tracing::{error, info};

#[derive(thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),
}

// main prints the Debug form of a returned error
impl Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Volunteers and crews as exported by the festival dashboard.
#[derive(Deserialize)]
struct RosterFile {
    volunteers: Vec<Volunteer>,
    crews: Vec<Crew>,
}

fn write_roster(roster: &Roster, writer: impl Write) -> Result<(), CliError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, roster)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn run() -> Result<(), CliError> {
    let config = get_config()?;
    setup_telemetry(&config.log_filter)?;

    info!(path = %config.roster_path.display(), "loading roster");
    let RosterFile { volunteers, crews } =
        serde_json::from_reader(BufReader::new(File::open(&config.roster_path)?))?;

    let roster = run_auto_assignment_with_progress(&volunteers, &crews, |progress| {
        info!("{progress}");
    })?;
    info!("{}", roster.summary());

    match &config.output_path {
        Some(path) => {
            write_roster(&roster, File::create(path)?)?;
            info!(path = %path.display(), "roster written");
        }
        None => write_roster(&roster, io::stdout().lock())?,
    }
    Ok(())
}

fn main() -> Result<(), CliError> {
    run().inspect_err(|err| error!("{err}"))
}
