//! Plan generation and redistribution commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use studyflow_core::{generate_plan, redistribute_missed_sessions, validate_locked_days_integrity};

use crate::commands::resolve_today;
use crate::snapshot::Snapshot;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Regenerate the full plan collection from the current tasks
    Generate {
        /// Snapshot file
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        /// Settings TOML overriding the snapshot's settings
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Working date (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Write the updated snapshot back
        #[arg(long)]
        write: bool,
        /// Print the resulting plans as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move sessions missed on past days forward
    Redistribute {
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        write: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show the current plans
    Show {
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        /// Restrict to one date
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            file,
            settings,
            today,
            write,
            json,
        } => {
            let mut snapshot = Snapshot::load_with_settings(&file, settings.as_deref())?;
            let today = resolve_today(today);
            let updated = generate_plan(
                &snapshot.tasks,
                &snapshot.settings,
                &snapshot.commitments,
                &snapshot.plans,
                today,
            );
            let violations = validate_locked_days_integrity(&snapshot.plans, &updated);
            if !violations.is_empty() {
                return Err(format!("locked-day integrity violated: {violations:?}").into());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&updated)?);
            } else {
                let sessions: usize = updated.values().map(|p| p.sessions.len()).sum();
                println!("planned {} sessions across {} days", sessions, updated.len());
            }
            snapshot.plans = updated;
            if write {
                snapshot.save(&file)?;
            }
            Ok(())
        }
        PlanAction::Redistribute {
            file,
            today,
            write,
            json,
        } => {
            let mut snapshot = Snapshot::load(&file)?;
            let today = resolve_today(today);
            let outcome = redistribute_missed_sessions(
                &snapshot.tasks,
                &snapshot.settings,
                &snapshot.commitments,
                &snapshot.plans,
                today,
            );
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "moved": outcome.moved,
                        "failed": outcome.failed,
                        "summary": outcome.summary,
                    }))?
                );
            } else {
                println!(
                    "moved {} sessions, {} failed",
                    outcome.summary.moved_count, outcome.summary.failed_count
                );
                for failure in &outcome.failed {
                    println!(
                        "  could not move {}#{} from {}: {}",
                        failure.task_id, failure.session_number, failure.date, failure.reason
                    );
                }
                for suggestion in &outcome.summary.suggestions {
                    println!("  hint: {suggestion}");
                }
            }
            snapshot.plans = outcome.plans;
            if write {
                snapshot.save(&file)?;
            }
            Ok(())
        }
        PlanAction::Show { file, date, json } => {
            let snapshot = Snapshot::load(&file)?;
            if json {
                match date {
                    Some(date) => {
                        println!("{}", serde_json::to_string_pretty(&snapshot.plans.get(&date))?)
                    }
                    None => println!("{}", serde_json::to_string_pretty(&snapshot.plans)?),
                }
                return Ok(());
            }
            for (plan_date, plan) in snapshot
                .plans
                .iter()
                .filter(|(d, _)| date.map_or(true, |want| **d == want))
            {
                let lock_marker = if plan.is_locked { " [locked]" } else { "" };
                println!(
                    "{plan_date}{lock_marker}  {:.2}h / {:.2}h",
                    plan.total_study_hours, plan.available_hours
                );
                for session in &plan.sessions {
                    println!(
                        "  {}-{} {} #{} {:?}{}",
                        session.start_time,
                        session.end_time,
                        session.task_id,
                        session.session_number,
                        session.status,
                        if session.done { " (done)" } else { "" }
                    );
                }
            }
            Ok(())
        }
    }
}
