use chrono::{DateTime, Utc};
use mail_parser::{MessageParser, PartType};
use shared_types::{MailMessage, ReceivedTime};
use std::path::PathBuf;

/// Errors raised at the boundary with a mail store.
#[derive(Debug, thiserror::Error)]
pub enum MailSourceError {
    #[error("Failed to connect to {0}: {1}")]
    Connect(String, String),

    #[error("Login failed for {0}: {1}")]
    Auth(String, String),

    #[error("Mailbox {0} unavailable: {1}")]
    Mailbox(String, String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A mail store the vendor update scan can read from.
///
/// Implementations may return messages older than `cutoff` (for example when
/// server side filtering is unavailable); callers always apply the cutoff
/// themselves.
pub trait MailSource {
    fn name(&self) -> &str;

    fn fetch_since(&mut self, cutoff: DateTime<Utc>) -> Result<Vec<MailMessage>, MailSourceError>;
}

/// Fixed set of accessors over a message whose fields may be missing or
/// loosely typed. Each accessor answers `None` instead of failing.
pub trait MessageAdapter {
    fn id(&self) -> String;

    fn subject(&self) -> Option<String>;

    fn received_time(&self) -> Option<ReceivedTime>;

    fn body_text(&self) -> Option<String>;

    fn body_html(&self) -> Option<String>;

    fn to_mail_message(&self) -> MailMessage {
        MailMessage {
            id: self.id(),
            subject: self.subject(),
            received_at: self.received_time().and_then(|t| t.resolve()),
            body_text: self.body_text(),
            body_html: self.body_html(),
        }
    }
}

/// An RFC 822 message parsed by `mail-parser`.
///
/// Received time order: `preferred` (e.g. IMAP INTERNALDATE), the `Date:`
/// header, then `fallback` (e.g. file modification time).
pub struct Rfc822Message<'x> {
    id: String,
    parsed: mail_parser::Message<'x>,
    preferred: Option<DateTime<Utc>>,
    fallback: Option<DateTime<Utc>>,
}

impl<'x> Rfc822Message<'x> {
    pub fn parse(id: impl Into<String>, raw: &'x [u8]) -> Result<Self, MailSourceError> {
        let id = id.into();
        let parsed = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| MailSourceError::Parse(format!("Message {} is not valid RFC 822", id)))?;

        Ok(Self {
            id,
            parsed,
            preferred: None,
            fallback: None,
        })
    }

    pub fn with_preferred_time(mut self, received: Option<DateTime<Utc>>) -> Self {
        self.preferred = received;
        self
    }

    pub fn with_fallback_time(mut self, received: Option<DateTime<Utc>>) -> Self {
        self.fallback = received;
        self
    }
}

impl<'x> Rfc822Message<'x> {
    fn first_part(&self, ids: &[usize]) -> Option<&mail_parser::MessagePart<'x>> {
        ids.first().and_then(|id| self.parsed.parts.get(*id))
    }
}

impl MessageAdapter for Rfc822Message<'_> {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn subject(&self) -> Option<String> {
        self.parsed.subject().map(|s| s.to_string())
    }

    fn received_time(&self) -> Option<ReceivedTime> {
        self.preferred
            .or_else(|| {
                self.parsed
                    .date()
                    .and_then(|dt| DateTime::from_timestamp(dt.to_timestamp(), 0))
            })
            .or(self.fallback)
            .map(ReceivedTime::Native)
    }

    /// Only a real `text/plain` part. `Message::body_text` would convert an
    /// HTML-only body, which has to go through the HTML normalizer instead.
    fn body_text(&self) -> Option<String> {
        match &self.first_part(&self.parsed.text_body)?.body {
            PartType::Text(text) => Some(text.to_string()),
            _ => None,
        }
    }

    fn body_html(&self) -> Option<String> {
        match &self.first_part(&self.parsed.html_body)?.body {
            PartType::Html(html) => Some(html.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RAW: &str = "From: ap@example.com\r\n\
To: finance@example.com\r\n\
Subject: FW: Esker Vendor Update - Batch 12\r\n\
Date: Thu, 22 Jan 2026 08:15:00 +0000\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
SG77 1000338436 SPEEDYLINK LOGISTICS SDN BHD\r\n";

    #[test]
    fn test_rfc822_adapter() {
        let message = Rfc822Message::parse("a.eml", RAW.as_bytes())
            .unwrap()
            .to_mail_message();

        assert_eq!(message.id, "a.eml");
        assert_eq!(message.subject.as_deref(), Some("FW: Esker Vendor Update - Batch 12"));
        assert_eq!(
            message.received_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 22, 8, 15, 0).unwrap())
        );
        assert!(message
            .body_text
            .unwrap()
            .contains("SG77 1000338436 SPEEDYLINK LOGISTICS SDN BHD"));
    }

    #[test]
    fn test_received_time_precedence() {
        let internal = Utc.with_ymd_and_hms(2026, 1, 22, 9, 0, 0).unwrap();
        let mtime = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let preferred = Rfc822Message::parse("1", RAW.as_bytes())
            .unwrap()
            .with_preferred_time(Some(internal))
            .with_fallback_time(Some(mtime))
            .to_mail_message();
        assert_eq!(preferred.received_at, Some(internal));

        let header = Rfc822Message::parse("2", RAW.as_bytes())
            .unwrap()
            .with_fallback_time(Some(mtime))
            .to_mail_message();
        assert_eq!(
            header.received_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 22, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_html_only_message_has_no_plain_body() {
        let raw = "Subject: Esker vendor update\r\n\
Date: Thu, 22 Jan 2026 08:15:00 +0000\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>SG12 999AAA ABC Co</p><br>SG13 1000 XYZ Inc\r\n";

        let message = Rfc822Message::parse("html.eml", raw.as_bytes())
            .unwrap()
            .to_mail_message();

        assert!(message.body_text.is_none());
        assert!(message.body_html.as_deref().unwrap().contains("<p>SG12 999AAA ABC Co</p>"));

        let extractor = extractors::VendorUpdateExtractor::default();
        assert_eq!(
            extractor.body_text(&message),
            "SG12 999AAA ABC Co\nSG13 1000 XYZ Inc"
        );
        assert_eq!(
            extractor.extract_from_message(&message),
            vec![
                shared_types::VendorRecord::new("SG12", "999AAA", "ABC Co"),
                shared_types::VendorRecord::new("SG13", "1000", "XYZ Inc"),
            ]
        );
    }

    #[test]
    fn test_plain_only_message_has_no_html_body() {
        let message = Rfc822Message::parse("a.eml", RAW.as_bytes())
            .unwrap()
            .to_mail_message();
        assert!(message.body_html.is_none());
    }

    #[test]
    fn test_missing_date_uses_fallback() {
        let raw = "Subject: vendor\r\n\r\nbody text here\r\n";
        let mtime = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

        let message = Rfc822Message::parse("3", raw.as_bytes())
            .unwrap()
            .with_fallback_time(Some(mtime))
            .to_mail_message();

        assert_eq!(message.received_at, Some(mtime));
    }
}
