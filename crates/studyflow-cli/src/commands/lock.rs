//! Day-locking commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use studyflow_core::{can_lock, evict_sessions_for_lock, lock_day, unlock_day, validate_lock};

use crate::commands::resolve_today;
use crate::snapshot::Snapshot;

#[derive(Subcommand)]
pub enum LockAction {
    /// Report whether a day can be locked and what it would cost
    Validate {
        /// Day to inspect
        date: NaiveDate,
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Lock a day, optionally evicting its pending sessions first
    Apply {
        /// Day to lock
        date: NaiveDate,
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Redistribute pending sessions to other days before locking
        #[arg(long)]
        evict: bool,
        #[arg(long)]
        write: bool,
    },
    /// Unlock a day
    Release {
        /// Day to unlock
        date: NaiveDate,
        #[arg(long, default_value = "studyflow.json")]
        file: PathBuf,
        #[arg(long)]
        write: bool,
    },
}

pub fn run(action: LockAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LockAction::Validate {
            date,
            file,
            today,
            json,
        } => {
            let snapshot = Snapshot::load(&file)?;
            let today = resolve_today(today);
            let report = validate_lock(
                date,
                &snapshot.tasks,
                &snapshot.settings,
                &snapshot.plans,
                today,
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            let check = can_lock(date, &snapshot.plans);
            println!(
                "{date}: lockable={}, pending sessions={}, pressure={:?}",
                report.can_lock && check.can_lock,
                check.pending_sessions,
                report.pressure
            );
            for blocker in &report.blockers {
                println!("  blocker: {blocker}");
            }
            for warning in &report.warnings {
                println!("  warning: {warning}");
            }
            Ok(())
        }
        LockAction::Apply {
            date,
            file,
            today,
            evict,
            write,
        } => {
            let mut snapshot = Snapshot::load(&file)?;
            let today = resolve_today(today);

            let report = validate_lock(
                date,
                &snapshot.tasks,
                &snapshot.settings,
                &snapshot.plans,
                today,
            );
            if !report.can_lock {
                return Err(format!("cannot lock {date}: {}", report.blockers.join("; ")).into());
            }

            if evict {
                let outcome = evict_sessions_for_lock(
                    date,
                    &snapshot.tasks,
                    &snapshot.settings,
                    &snapshot.commitments,
                    &snapshot.plans,
                    today,
                );
                println!(
                    "evicted {} sessions, {} failed",
                    outcome.summary.moved_count, outcome.summary.failed_count
                );
                for failure in &outcome.failed {
                    println!(
                        "  {}#{}: {}",
                        failure.task_id, failure.session_number, failure.reason
                    );
                }
                snapshot.plans = outcome.plans;
            }

            let check = can_lock(date, &snapshot.plans);
            if !check.can_lock {
                return Err(format!(
                    "cannot lock {date}: {} pending sessions remain (run with --evict)",
                    check.pending_sessions
                )
                .into());
            }

            lock_day(date, &mut snapshot.plans, &snapshot.settings);
            println!("{date} locked");
            if write {
                snapshot.save(&file)?;
            }
            Ok(())
        }
        LockAction::Release { date, file, write } => {
            let mut snapshot = Snapshot::load(&file)?;
            unlock_day(date, &mut snapshot.plans, &snapshot.settings);
            println!("{date} unlocked");
            if write {
                snapshot.save(&file)?;
            }
            Ok(())
        }
    }
}
