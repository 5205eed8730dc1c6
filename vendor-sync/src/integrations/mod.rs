pub mod eml_directory;
pub mod imap_source;
pub mod json_export;
pub mod mail_source;

pub use eml_directory::EmlDirectorySource;
pub use imap_source::ImapMailSource;
pub use json_export::JsonExportSource;
pub use mail_source::{MailSource, MailSourceError, MessageAdapter, Rfc822Message};

use crate::config::{AppConfig, SourceKind};
use anyhow::{Context, Result};

/// Builds the mail source selected in `[source]`.
pub fn open_source(config: &AppConfig) -> Result<Box<dyn MailSource>> {
    match config.source.kind {
        SourceKind::Imap => {
            let imap = config
                .imap
                .as_ref()
                .context("source.kind is \"imap\" but the [imap] section is missing")?;
            let password = imap.password.as_deref().context(
                "No IMAP password configured (set imap.password or VENDOR_SYNC_IMAP__PASSWORD)",
            )?;

            let source = ImapMailSource::connect_with_password(
                &imap.host,
                imap.port,
                &imap.username,
                password,
                &imap.mailbox,
            )?;
            Ok(Box::new(source))
        }
        SourceKind::EmlDir => {
            let dir = config
                .source
                .path
                .as_ref()
                .context("source.kind is \"eml-dir\" but source.path is not set")?;
            Ok(Box::new(EmlDirectorySource::new(dir)))
        }
        SourceKind::JsonExport => {
            let path = config
                .source
                .path
                .as_ref()
                .context("source.kind is \"json-export\" but source.path is not set")?;
            Ok(Box::new(JsonExportSource::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use std::path::PathBuf;

    #[test]
    fn test_file_sources() {
        let mut config = AppConfig::default();
        config.source = SourceConfig {
            kind: SourceKind::EmlDir,
            path: Some(PathBuf::from("/data/eml")),
        };
        assert_eq!(open_source(&config).unwrap().name(), "eml-dir:/data/eml");

        config.source.kind = SourceKind::JsonExport;
        assert!(open_source(&config).unwrap().name().starts_with("json-export:"));
    }

    #[test]
    fn test_missing_settings() {
        let mut config = AppConfig::default();
        assert!(open_source(&config).is_err());

        config.source.kind = SourceKind::EmlDir;
        assert!(open_source(&config).is_err());
    }
}
