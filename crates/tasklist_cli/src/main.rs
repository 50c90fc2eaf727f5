//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasklist_core` linkage.
//! - Report what the configured storage slot currently holds. Opening may
//!   create the database file and run migrations; the task slot itself is
//!   never modified.

use std::process::ExitCode;
use tasklist_core::{open_service, StorageConfig};

fn main() -> ExitCode {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());

    let config = StorageConfig::from_env();
    println!("tasklist_core db_path={}", config.db_path.display());

    match open_service(&config) {
        Ok(service) => {
            println!(
                "tasklist_core tasks={} pending={} completed={}",
                service.tasks().len(),
                service.pending_count(),
                service.completed_count()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tasklist_core storage error: {err}");
            ExitCode::FAILURE
        }
    }
}
