pub mod email;
pub mod settings;
pub mod vendor;

pub use email::{MailMessage, ReceivedTime, RECEIVED_TIME_TEXT_FORMAT};
pub use settings::{
    ScanSettings, SubjectFilter, DEFAULT_MINUTES_BACK, DEFAULT_MIN_KEYWORD_HITS,
    DEFAULT_SUBJECT_KEYWORDS, DEFAULT_SUBJECT_PHRASES,
};
pub use vendor::{ResultSet, VendorRecord};
