use crate::integrations::MailSource;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use extractors::{assemble, VendorUpdateExtractor};
use shared_types::{ResultSet, ScanSettings};

/// What a single scan looked at and what it produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub source: String,
    pub cutoff: DateTime<Utc>,
    /// Messages returned by the source, before the time window is applied
    pub messages_scanned: usize,
    pub messages_matched: usize,
    /// Rows before deduplication
    pub rows_extracted: usize,
    pub result: ResultSet,
}

/// Reads recent messages from `source`, keeps those whose subject looks like
/// a vendor update and collects the vendor triplets in their bodies.
///
/// Messages are processed newest first; messages without a known received
/// time are kept and processed last.
pub fn run_vendor_update_scan(
    source: &mut dyn MailSource,
    settings: &ScanSettings,
    now: DateTime<Utc>,
) -> Result<ScanReport> {
    let source_name = source.name().to_string();
    let cutoff = now - Duration::minutes(i64::from(settings.minutes_back));

    tracing::info!(
        "Scanning {} for vendor updates received since {}",
        source_name,
        cutoff.to_rfc3339()
    );

    let mut messages = source
        .fetch_since(cutoff)
        .with_context(|| format!("Failed to read messages from {}", source_name))?;
    let messages_scanned = messages.len();

    messages.retain(|m| m.received_at.map_or(true, |received| received >= cutoff));
    messages.sort_by(|a, b| b.received_at.cmp(&a.received_at));

    let extractor = VendorUpdateExtractor::new(&settings.subject);
    let mut rows = Vec::new();
    let mut messages_matched = 0;

    for message in messages.iter().filter(|m| extractor.is_relevant(m)) {
        messages_matched += 1;
        tracing::debug!(
            "Matching message found - Subject: '{}' Received: {}",
            message.subject_or_empty(),
            message
                .received_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let extracted = extractor.extract_from_message(message);
        tracing::debug!(
            "Extracted {} rows from message #{} ({})",
            extracted.len(),
            messages_matched,
            message.id
        );
        rows.extend(extracted);
    }

    let rows_extracted = rows.len();
    let result = assemble(rows);

    tracing::info!(
        "Messages scanned: {}, matched: {}, rows extracted: {}, unique rows: {}",
        messages_scanned,
        messages_matched,
        rows_extracted,
        result.len()
    );

    Ok(ScanReport {
        source: source_name,
        cutoff,
        messages_scanned,
        messages_matched,
        rows_extracted,
        result,
    })
}
