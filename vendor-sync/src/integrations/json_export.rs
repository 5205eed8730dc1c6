use crate::integrations::mail_source::{MailSource, MailSourceError, MessageAdapter};
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared_types::{MailMessage, ReceivedTime};
use std::fs;
use std::path::PathBuf;

/// A JSON array of messages exported from a desktop mail client.
///
/// Exports are loosely typed: fields may be missing, null, numbers or
/// strings, and may use either snake case or the client's own property names.
pub struct JsonExportSource {
    path: PathBuf,
    name: String,
}

impl JsonExportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("json-export:{}", path.display());
        Self { path, name }
    }
}

impl MailSource for JsonExportSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_since(&mut self, _cutoff: DateTime<Utc>) -> Result<Vec<MailMessage>, MailSourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| MailSourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        parse_export(&raw)
    }
}

pub fn parse_export(raw: &str) -> Result<Vec<MailMessage>, MailSourceError> {
    let items: Vec<Value> = serde_json::from_str(raw)
        .map_err(|e| MailSourceError::Parse(format!("Expected a JSON array of messages: {}", e)))?;

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, value)| ExportedItem { index, value }.to_mail_message())
        .collect())
}

struct ExportedItem<'a> {
    index: usize,
    value: &'a Value,
}

impl ExportedItem<'_> {
    fn field(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .filter_map(|name| self.value.get(*name))
            .find(|v| !v.is_null())
    }

    fn text(&self, names: &[&str]) -> Option<String> {
        match self.field(names)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl MessageAdapter for ExportedItem<'_> {
    fn id(&self) -> String {
        self.text(&["id", "EntryID"])
            .unwrap_or_else(|| format!("#{}", self.index))
    }

    fn subject(&self) -> Option<String> {
        self.text(&["subject", "Subject"])
    }

    fn received_time(&self) -> Option<ReceivedTime> {
        match self.field(&["received_time", "ReceivedTime", "received_at"])? {
            Value::Number(n) => n.as_f64().map(ReceivedTime::Epoch),
            Value::String(s) => Some(ReceivedTime::Text(s.clone())),
            _ => None,
        }
    }

    fn body_text(&self) -> Option<String> {
        self.text(&["body", "Body"])
    }

    fn body_html(&self) -> Option<String> {
        self.text(&["html_body", "HTMLBody"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_mixed_field_names_and_types() {
        let raw = r#"[
            {
                "Subject": "FW: Esker Vendor Update - Batch 12",
                "ReceivedTime": "2026-01-22 08:15:00",
                "Body": "SG77 1000338436 SPEEDYLINK LOGISTICS SDN BHD"
            },
            {
                "id": "abc",
                "subject": null,
                "received_time": 1767225600,
                "html_body": "<p>SG80 1000445566 ACME</p>"
            },
            {
                "subject": 42,
                "received_time": {"unexpected": true}
            }
        ]"#;

        let messages = parse_export(raw).unwrap();

        assert_eq!(messages.len(), 3);

        assert_eq!(messages[0].id, "#0");
        assert_eq!(
            messages[0].received_at,
            Local
                .with_ymd_and_hms(2026, 1, 22, 8, 15, 0)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
        );
        assert!(messages[0].body_html.is_none());

        assert_eq!(messages[1].id, "abc");
        assert!(messages[1].subject.is_none());
        assert_eq!(messages[1].received_at.unwrap().timestamp(), 1_767_225_600);
        assert_eq!(messages[1].body_html.as_deref(), Some("<p>SG80 1000445566 ACME</p>"));

        assert_eq!(messages[2].subject.as_deref(), Some("42"));
        assert!(messages[2].received_at.is_none());
    }

    #[test]
    fn test_not_an_array() {
        let err = parse_export(r#"{"subject": "x"}"#).unwrap_err();
        assert!(matches!(err, MailSourceError::Parse(_)));
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.json");
        fs::write(&path, r#"[{"subject": "vendor"}]"#).unwrap();

        let mut source = JsonExportSource::new(&path);
        let messages = source.fetch_since(Utc::now()).unwrap();

        assert_eq!(messages.len(), 1);
        assert!(source.name().starts_with("json-export:"));
    }
}
