//! Snapshot management commands.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use studyflow_core::{FixedCommitment, PlanSet, PlannerSettings, Task, TaskStatus};
use uuid::Uuid;

use crate::commands::resolve_today;
use crate::snapshot::Snapshot;

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// Write a starter snapshot with default settings and a sample task
    Init {
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

pub fn run(action: SnapshotAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SnapshotAction::Init { file, force, today } => {
            if file.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                )
                .into());
            }
            let today = resolve_today(today);
            let snapshot = Snapshot {
                settings: PlannerSettings::default(),
                tasks: vec![Task {
                    id: Uuid::new_v4().to_string(),
                    title: "Sample task".into(),
                    estimated_hours: 4.0,
                    deadline: today + chrono::Duration::days(14),
                    important: false,
                    status: TaskStatus::Pending,
                    preferred_frequency: None,
                    min_block_minutes: None,
                }],
                commitments: vec![FixedCommitment {
                    id: Uuid::new_v4().to_string(),
                    title: "Lunch".into(),
                    start_time: "12:00".into(),
                    end_time: "13:00".into(),
                    recurring: true,
                    days_of_week: vec![1, 2, 3, 4, 5],
                    specific_dates: vec![],
                    deleted_occurrences: vec![],
                    modified_occurrences: BTreeMap::new(),
                }],
                plans: PlanSet::new(),
            };
            snapshot.save(&file)?;
            println!("wrote starter snapshot to {}", file.display());
            Ok(())
        }
    }
}
