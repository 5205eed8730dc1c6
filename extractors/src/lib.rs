//! Extractors Crate
//!
//! Pure text extraction for vendor update messages. Nothing here performs I/O;
//! mail access lives in `vendor-sync`.
//!
//! # Pipeline
//!
//! - `html_text`: markup to plain text, used when a message has no usable plain body
//! - `subject_filter`: keyword/phrase heuristics over the subject line
//! - `vendor_updates`: `(company code, vendor number, name)` triplets and their
//!   deduplicated assembly into a `ResultSet`
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{assemble, VendorUpdateExtractor};
//! use shared_types::SubjectFilter;
//!
//! let extractor = VendorUpdateExtractor::new(&SubjectFilter::default());
//! let rows = messages
//!     .iter()
//!     .filter(|m| extractor.is_relevant(m))
//!     .flat_map(|m| extractor.extract_from_message(m));
//! let result = assemble(rows);
//! ```

pub mod html_text;
pub mod subject_filter;
pub mod vendor_updates;

// Re-export commonly used types
pub use html_text::HtmlTextNormalizer;
pub use subject_filter::{subject_matches, SubjectClassifier};
pub use vendor_updates::{assemble, TripletExtractor, VendorUpdateExtractor, MIN_PLAIN_BODY_CHARS};
