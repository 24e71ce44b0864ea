//! Session maintenance commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use studyflow_core::combine_sessions;

use crate::snapshot::Snapshot;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Merge same-task fragments on one day into a single session
    Combine {
        /// Day to clean up
        date: NaiveDate,
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        write: bool,
    },
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionsAction::Combine { date, file, write } => {
            let mut snapshot = Snapshot::load(&file)?;
            let merged = combine_sessions(date, &mut snapshot.plans, &snapshot.settings);
            println!("merged {merged} session groups on {date}");
            if write {
                snapshot.save(&file)?;
            }
            Ok(())
        }
    }
}
