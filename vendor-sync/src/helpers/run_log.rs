use crate::helpers::export::{render_table, NO_RESULTS_MESSAGE};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use shared_types::ResultSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Plain text record of one run, kept next to the exported rows so an
/// operator can see what was handed on and when.
///
/// Files are named `log_<YYYY-MM-DD_HH-MM-SS>.txt`, one per run.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn create(dir: &Path, started: NaiveDateTime) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create run log directory {:?}", dir))?;

        let path = dir.join(format!("log_{}.txt", started.format("%Y-%m-%d_%H-%M-%S")));
        let log = Self { path };
        log.append(&format!(
            "Process initialized: {}\n",
            started.format(TIMESTAMP_FORMAT)
        ))?;

        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_result(&self, result: &ResultSet, completed: NaiveDateTime) -> Result<()> {
        let mut entry = String::new();

        if result.is_empty() {
            entry.push_str(NO_RESULTS_MESSAGE);
            entry.push('\n');
        } else {
            entry.push_str(&format!(
                "Extracted entities: {}\n",
                result.company_codes().join(", ")
            ));
            entry.push_str(&format!(
                "Extracted vendors: {}\n",
                result.vendor_numbers().join(", ")
            ));
            entry.push_str(&format!(" Data: \n{}", render_table(result)));
        }
        entry.push_str(&format!(
            "Process completed: {}\n",
            completed.format(TIMESTAMP_FORMAT)
        ));

        self.append(&entry)
    }

    fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open run log {:?}", self.path))?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}
