use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Default dataset path; `generate_sample` writes a synthetic file under this
/// name in the working directory.
pub const DEFAULT_DATA_FILE: &str = "dados-imersao-final.csv";

/// Command-line arguments; everything else is configured through `RUST_LOG`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Salary dataset (.csv, .json or .parquet). Run `generate_sample` to
    /// create a synthetic one at the default path.
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Job title whose mean salary is mapped per country.
    #[arg(long, default_value = "Data Scientist")]
    pub role: String,

    /// Number of job titles in the salary ranking chart.
    #[arg(long, default_value = "10")]
    pub top_n: usize,

    /// Number of bins in the salary distribution chart.
    #[arg(long, default_value = "30")]
    pub bins: usize,
}

/// Validated settings shared by the pipeline and the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub focus_role: String,
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            focus_role: "Data Scientist".to_string(),
            top_n: 10,
            histogram_bins: 30,
        }
    }
}

impl Args {
    pub fn into_config(self) -> Result<DashboardConfig> {
        if self.top_n == 0 {
            bail!("--top-n must be at least 1");
        }
        if self.bins == 0 {
            bail!("--bins must be at least 1");
        }
        let focus_role = self.role.trim().to_string();
        if focus_role.is_empty() {
            bail!("--role must not be empty");
        }

        Ok(DashboardConfig {
            data_path: self.data,
            focus_role,
            top_n: self.top_n,
            histogram_bins: self.bins,
        })
    }
}
