//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the analytics views.

pub mod filter;
pub mod history;
pub mod report;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::PocketbookPaths;
use crate::error::{PocketbookError, PocketbookResult};
use crate::export::load_records;
use crate::models::TransactionRecord;

pub use filter::FilterArgs;
pub use history::{handle_history_command, HistoryArgs};
pub use report::{handle_report_command, ReportArgs};

/// Load records from `file`, or from the default transactions file
fn load_transactions(
    paths: &PocketbookPaths,
    file: Option<&Path>,
) -> PocketbookResult<Vec<TransactionRecord>> {
    match file {
        Some(path) => load_records(path),
        None => {
            let path = paths.transactions_file();
            load_records(&path).map_err(|e| {
                if e.is_not_found() {
                    PocketbookError::Config(format!(
                        "No transactions at {}. Run 'pocketbook init' or pass --file.",
                        path.display()
                    ))
                } else {
                    e
                }
            })
        }
    }
}

/// Open an export destination
fn create_output(path: &Path) -> PocketbookResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        PocketbookError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
