use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A message as seen by the vendor update scan.
///
/// Owned by whatever mail store produced it; the pipeline only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailMessage {
    /// Source specific identifier (IMAP UID, file name, export index)
    pub id: String,
    pub subject: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

impl MailMessage {
    pub fn subject_or_empty(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }
}

/// Fixed text layout accepted as the last step of the received time chain.
pub const RECEIVED_TIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A received timestamp as reported by a loosely typed mail store.
///
/// Stores that hand out dynamically typed values may report a real datetime,
/// a numeric epoch, or a string. `resolve` turns any of them into a UTC
/// timestamp when possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReceivedTime {
    Native(DateTime<Utc>),
    Epoch(f64),
    Text(String),
}

impl ReceivedTime {
    /// Coercion order: native datetime, numeric epoch seconds, then text.
    ///
    /// Text is tried as RFC 3339, RFC 2822, an epoch number and finally
    /// [`RECEIVED_TIME_TEXT_FORMAT`], which carries no offset and is read as
    /// local time.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            ReceivedTime::Native(dt) => Some(*dt),
            ReceivedTime::Epoch(secs) => epoch_to_utc(*secs),
            ReceivedTime::Text(raw) => parse_received_text(raw),
        }
    }
}

fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

fn parse_received_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(secs) = raw.parse::<f64>() {
        return epoch_to_utc(secs);
    }

    let naive = NaiveDateTime::parse_from_str(raw, RECEIVED_TIME_TEXT_FORMAT).ok()?;
    // Ambiguous local times (DST fold) take the earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
