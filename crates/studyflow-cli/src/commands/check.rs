//! Feasibility check commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use studyflow_core::{check_commitment_conflicts, check_frequency_deadline_conflict};

use crate::commands::resolve_today;
use crate::snapshot::Snapshot;

#[derive(Subcommand)]
pub enum CheckAction {
    /// Can each task's hours fit under its requested cadence?
    Frequency {
        /// Restrict to one task id
        #[arg(long)]
        task: Option<String>,
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Does a commitment collide with the others in the snapshot?
    Commitment {
        /// Commitment id to test
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CheckAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CheckAction::Frequency {
            task,
            file,
            today,
            json,
        } => {
            let snapshot = Snapshot::load(&file)?;
            let today = resolve_today(today);
            let mut reports = Vec::new();
            for t in snapshot
                .tasks
                .iter()
                .filter(|t| task.as_ref().map_or(true, |want| &t.id == want))
            {
                let check = check_frequency_deadline_conflict(t, &snapshot.settings, today);
                reports.push((t.id.clone(), check));
            }
            if task.is_some() && reports.is_empty() {
                return Err("no such task in the snapshot".into());
            }
            if json {
                let body: serde_json::Map<String, serde_json::Value> = reports
                    .into_iter()
                    .map(|(id, check)| (id, serde_json::to_value(check).unwrap_or_default()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }
            for (id, check) in reports {
                if check.feasible {
                    println!(
                        "{id}: feasible ({} sessions, up to {:.1}h)",
                        check.sessions_available, check.max_hours
                    );
                } else {
                    println!("{id}: NOT feasible -- {}", check.reason.unwrap_or_default());
                }
            }
            Ok(())
        }
        CheckAction::Commitment { id, file, json } => {
            let snapshot = Snapshot::load(&file)?;
            let commitment = snapshot
                .commitments
                .iter()
                .find(|c| c.id == id)
                .ok_or("no such commitment in the snapshot")?;
            commitment.validate()?;
            let conflicts = check_commitment_conflicts(commitment, &snapshot.commitments);
            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
                return Ok(());
            }
            if conflicts.is_empty() {
                println!("{id}: no conflicts");
            }
            for conflict in conflicts {
                println!(
                    "{id}: {:?} conflict with '{}' ({})",
                    conflict.kind, conflict.commitment_title, conflict.commitment_id
                );
            }
            Ok(())
        }
    }
}
