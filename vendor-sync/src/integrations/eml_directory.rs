use crate::integrations::mail_source::{MailSource, MailSourceError, MessageAdapter, Rfc822Message};
use chrono::{DateTime, Utc};
use shared_types::MailMessage;
use std::fs;
use std::path::{Path, PathBuf};

/// Every `*.eml` file in one directory, e.g. messages saved out of a desktop
/// mail client.
pub struct EmlDirectorySource {
    dir: PathBuf,
    name: String,
}

impl EmlDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = format!("eml-dir:{}", dir.display());
        Self { dir, name }
    }

    fn eml_files(&self) -> Result<Vec<PathBuf>, MailSourceError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| MailSourceError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_eml(path))
            .collect();
        files.sort();

        Ok(files)
    }
}

impl MailSource for EmlDirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    /// Reads all files; the cutoff is left to the caller since the only
    /// reliable timestamp is inside each file.
    fn fetch_since(&mut self, _cutoff: DateTime<Utc>) -> Result<Vec<MailMessage>, MailSourceError> {
        let mut messages = Vec::new();

        for path in self.eml_files()? {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let raw = match fs::read(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {:?}: {}", path, e);
                    continue;
                }
            };

            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);

            match Rfc822Message::parse(file_name, &raw) {
                Ok(parsed) => messages.push(parsed.with_fallback_time(modified).to_mail_message()),
                Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
            }
        }

        Ok(messages)
    }
}

fn is_eml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("eml"))
        .unwrap_or(false)
}
