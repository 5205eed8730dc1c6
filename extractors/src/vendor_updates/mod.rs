mod triplet;

pub use triplet::TripletExtractor;

use crate::html_text::HtmlTextNormalizer;
use crate::subject_filter::SubjectClassifier;
use shared_types::{MailMessage, ResultSet, SubjectFilter, VendorRecord};

/// Plain bodies shorter than this are treated as missing and the HTML body
/// is used instead.
pub const MIN_PLAIN_BODY_CHARS: usize = 5;

/// Subject filtering plus triplet extraction for one immutable [`SubjectFilter`].
pub struct VendorUpdateExtractor {
    classifier: SubjectClassifier,
    triplets: TripletExtractor,
    html: HtmlTextNormalizer,
}

impl VendorUpdateExtractor {
    pub fn new(filter: &SubjectFilter) -> Self {
        Self {
            classifier: SubjectClassifier::new(filter),
            triplets: TripletExtractor::new(),
            html: HtmlTextNormalizer::new(),
        }
    }

    pub fn is_relevant(&self, message: &MailMessage) -> bool {
        self.classifier.matches(message.subject.as_deref())
    }

    /// The trimmed plain body, or the normalized HTML body when the plain one
    /// is absent or implausibly short.
    pub fn body_text(&self, message: &MailMessage) -> String {
        let plain = message.body_text.as_deref().unwrap_or("").trim();
        if plain.chars().count() >= MIN_PLAIN_BODY_CHARS {
            return plain.to_string();
        }

        tracing::debug!(
            "Message {} has no usable plain body, falling back to HTML",
            message.id
        );
        self.html
            .to_plain_text(message.body_html.as_deref().unwrap_or(""))
    }

    pub fn extract_text(&self, text: &str) -> Vec<VendorRecord> {
        self.triplets.extract(text)
    }

    pub fn extract_from_message(&self, message: &MailMessage) -> Vec<VendorRecord> {
        self.triplets.extract(&self.body_text(message))
    }
}

impl Default for VendorUpdateExtractor {
    fn default() -> Self {
        Self::new(&SubjectFilter::default())
    }
}

/// Keeps the first occurrence of every distinct record, in input order.
pub fn assemble<I>(records: I) -> ResultSet
where
    I: IntoIterator<Item = VendorRecord>,
{
    ResultSet::from_records(records)
}
