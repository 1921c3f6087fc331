use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use summary_lab::data::{loader, sample};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Filter, group and summarize small datasets.
///
/// Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=summary_lab=debug`).
#[derive(Debug, Parser)]
#[command(name = "summary-lab", version, about)]
pub struct LaunchConfig {
    /// Dataset to open (.json, .csv, .parquet). Defaults to the employee sample.
    pub path: Option<PathBuf>,

    /// Start with the chart sandbox points instead of the employee sample.
    #[arg(long, conflicts_with = "path")]
    pub sandbox: bool,

    /// Field to group by on start-up.
    #[arg(long, value_name = "FIELD")]
    pub group_by: Option<String>,

    /// Numeric field to describe on start-up.
    #[arg(long, value_name = "FIELD")]
    pub stats_field: Option<String>,
}

impl LaunchConfig {
    /// Load the requested dataset and apply the start-up selections.
    pub fn initial_state(&self) -> Result<AppState> {
        let mut state = AppState::default();
        match &self.path {
            Some(path) => {
                let dataset = loader::load_file(path)?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                state.set_dataset(name, dataset);
            }
            None if self.sandbox => state.set_dataset("sandbox", sample::sandbox_points()),
            None => state.set_dataset("employees", sample::employees()),
        }

        let columns = state
            .dataset()
            .map(|ds| ds.columns().to_vec())
            .unwrap_or_default();

        if let Some(field) = &self.group_by {
            ensure!(columns.contains(field), "--group-by: unknown field '{field}'");
            state.set_group_by(Some(field.clone()));
        }
        if let Some(field) = &self.stats_field {
            ensure!(columns.contains(field), "--stats-field: unknown field '{field}'");
            state.set_stats_field(Some(field.clone()));
        }
        Ok(state)
    }
}
