use crate::helpers::export::OutputFormat;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use shared_types::{
    ScanSettings, SubjectFilter, DEFAULT_MINUTES_BACK, DEFAULT_MIN_KEYWORD_HITS,
    DEFAULT_SUBJECT_KEYWORDS, DEFAULT_SUBJECT_PHRASES,
};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"
[scan]
minutes_back = 30
# Set to 2 for stricter "combination" matching
min_subject_keyword_hits = 1
subject_keywords = ["esker", "vendor", "update"]
subject_phrases = ["esker vendor update", "esker vendor"]

[source]
# imap | eml-dir | json-export
kind = "imap"
# path = "/path/to/exported/messages"

[imap]
host = "imap.example.com"
port = 993
username = ""
# Prefer VENDOR_SYNC_IMAP__PASSWORD in the environment
# password = ""
mailbox = "INBOX"

[output]
# table | csv | json
format = "table"
# path = "vendor_updates.csv"
# run_log_dir = "/path/to/logs"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub imap: Option<ImapConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    pub minutes_back: u32,
    pub min_subject_keyword_hits: usize,
    pub subject_keywords: Vec<String>,
    pub subject_phrases: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            minutes_back: DEFAULT_MINUTES_BACK,
            min_subject_keyword_hits: DEFAULT_MIN_KEYWORD_HITS,
            subject_keywords: DEFAULT_SUBJECT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            subject_phrases: DEFAULT_SUBJECT_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    pub fn to_settings(&self) -> ScanSettings {
        ScanSettings {
            minutes_back: self.minutes_back,
            subject: SubjectFilter {
                keywords: self.subject_keywords.clone(),
                phrases: self.subject_phrases.clone(),
                min_keyword_hits: self.min_subject_keyword_hits,
            },
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    #[default]
    Imap,
    EmlDir,
    JsonExport,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImapConfig {
    pub host: String,
    #[serde(default = "default_imap_port")]
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    #[serde(default = "default_mailbox")]
    pub mailbox: String,
}

fn default_imap_port() -> u16 {
    993
}

fn default_mailbox() -> String {
    "INBOX".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
    pub run_log_dir: Option<PathBuf>,
}

/// Command line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub minutes_back: Option<u32>,
    pub min_keyword_hits: Option<usize>,
    pub eml_dir: Option<PathBuf>,
    pub json_export: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub run_log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `path`, or the default location (created on first run).
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Message(format!(
                        "Config file not found at {:?}",
                        path
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let config_path = get_config_path();
                write_default_config(&config_path)?;
                config_path
            }
        };

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(
                Environment::with_prefix("VENDOR_SYNC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(minutes_back) = overrides.minutes_back {
            self.scan.minutes_back = minutes_back;
        }
        if let Some(hits) = overrides.min_keyword_hits {
            self.scan.min_subject_keyword_hits = hits;
        }
        if let Some(dir) = &overrides.eml_dir {
            self.source = SourceConfig {
                kind: SourceKind::EmlDir,
                path: Some(dir.clone()),
            };
        }
        if let Some(file) = &overrides.json_export {
            self.source = SourceConfig {
                kind: SourceKind::JsonExport,
                path: Some(file.clone()),
            };
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if let Some(path) = &overrides.output {
            self.output.path = Some(path.clone());
        }
        if let Some(dir) = &overrides.run_log_dir {
            self.output.run_log_dir = Some(dir.clone());
        }
    }
}

fn write_default_config(config_path: &Path) -> Result<(), ConfigError> {
    if config_path.exists() {
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))?;

    tracing::info!("Wrote default config to {:?}", config_path);
    Ok(())
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("esker-vendor-sync").join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::from_toml_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.scan.to_settings(), ScanSettings::default());
        assert_eq!(config.source.kind, SourceKind::Imap);
        let imap = config.imap.unwrap();
        assert_eq!(imap.port, 993);
        assert_eq!(imap.mailbox, "INBOX");
        assert!(imap.password.is_none());
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.scan.minutes_back, 30);
        assert!(config.imap.is_none());
    }

    #[test]
    fn test_partial_scan_section() {
        let config = AppConfig::from_toml_str(
            r#"
[scan]
min_subject_keyword_hits = 2
subject_phrases = []

[source]
kind = "json-export"
path = "/tmp/inbox.json"
"#,
        )
        .unwrap();

        let settings = config.scan.to_settings();
        assert_eq!(settings.minutes_back, 30);
        assert_eq!(settings.subject.min_keyword_hits, 2);
        assert!(settings.subject.phrases.is_empty());
        assert_eq!(settings.subject.keywords.len(), 3);
        assert_eq!(config.source.kind, SourceKind::JsonExport);
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(&ConfigOverrides {
            minutes_back: Some(120),
            min_keyword_hits: Some(2),
            eml_dir: Some(PathBuf::from("/data/eml")),
            format: Some(OutputFormat::Csv),
            output: Some(PathBuf::from("out.csv")),
            ..Default::default()
        });

        assert_eq!(config.scan.minutes_back, 120);
        assert_eq!(config.scan.min_subject_keyword_hits, 2);
        assert_eq!(config.source.kind, SourceKind::EmlDir);
        assert_eq!(config.source.path, Some(PathBuf::from("/data/eml")));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.path, Some(PathBuf::from("out.csv")));
        assert!(config.output.run_log_dir.is_none());
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scan]\nminutes_back = 5\n").unwrap();

        let (config, loaded_from) = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.scan.minutes_back, 5);
        assert_eq!(loaded_from, path);
    }
}
