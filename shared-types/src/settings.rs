use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT_KEYWORDS: [&str; 3] = ["esker", "vendor", "update"];
pub const DEFAULT_SUBJECT_PHRASES: [&str; 2] = ["esker vendor update", "esker vendor"];
pub const DEFAULT_MIN_KEYWORD_HITS: usize = 1;
pub const DEFAULT_MINUTES_BACK: u32 = 30;

/// Subject heuristics deciding whether a message carries vendor updates.
///
/// Any phrase found in the subject is an immediate match. Otherwise at least
/// `min_keyword_hits` distinct keywords must appear. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFilter {
    pub keywords: Vec<String>,
    pub phrases: Vec<String>,
    pub min_keyword_hits: usize,
}

impl Default for SubjectFilter {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_SUBJECT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            phrases: DEFAULT_SUBJECT_PHRASES.iter().map(|s| s.to_string()).collect(),
            min_keyword_hits: DEFAULT_MIN_KEYWORD_HITS,
        }
    }
}

/// Everything one vendor update scan needs besides the mail source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Only messages received within this many minutes are considered
    pub minutes_back: u32,
    pub subject: SubjectFilter,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            minutes_back: DEFAULT_MINUTES_BACK,
            subject: SubjectFilter::default(),
        }
    }
}
