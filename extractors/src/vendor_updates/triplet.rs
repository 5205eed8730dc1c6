use regex::Regex;
use shared_types::VendorRecord;

/// Separator characters stripped from both ends of an extracted name.
const NAME_EDGE_CHARS: [char; 3] = [' ', '-', '|'];

/// Finds `SG77 1000338436 SPEEDYLINK LOGISTICS SDN BHD` shaped lines.
///
/// A record is a company code (two uppercase letters and two digits), a
/// vendor number of 3 to 40 non-whitespace characters, then the rest of the
/// line as the vendor name. Fields are separated by spaces or tabs, so a
/// record never continues onto the next line.
pub struct TripletExtractor {
    regex: Regex,
}

impl TripletExtractor {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(
                r"(?m)\b(?P<company>[A-Z]{2}[0-9]{2})[^\S\r\n]+(?P<vendor>\S{3,40})[^\S\r\n]+(?P<name>[^\r\n]+)",
            )
            .unwrap(),
        }
    }

    /// Records in order of appearance. Text without matches gives an empty vec.
    /// A name made only of separators is kept as an empty string.
    pub fn extract(&self, text: &str) -> Vec<VendorRecord> {
        self.regex
            .captures_iter(text)
            .map(|caps| VendorRecord {
                company_code: caps["company"].to_string(),
                vendor_number: caps["vendor"].to_string(),
                name: clean_name(&caps["name"]),
            })
            .collect()
    }
}

impl Default for TripletExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapses whitespace runs and trims separators at the edges only.
fn clean_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(&NAME_EDGE_CHARS[..])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_lines() {
        let extractor = TripletExtractor::new();
        let text = "SG77 1000338436 SPEEDYLINK LOGISTICS SDN BHD\nSG80 1000445566 ACME TRADING PTE LTD";

        let records = extractor.extract(text);

        assert_eq!(
            records,
            vec![
                VendorRecord::new("SG77", "1000338436", "SPEEDYLINK LOGISTICS SDN BHD"),
                VendorRecord::new("SG80", "1000445566", "ACME TRADING PTE LTD"),
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let extractor = TripletExtractor::new();
        let text = "Hi team,\r\nSG12 999AAA ABC Co\r\nSG13 1000 XYZ Inc\r\nThanks";
        assert_eq!(extractor.extract(text), extractor.extract(text));
        assert_eq!(extractor.extract(text).len(), 2);
    }

    #[test]
    fn test_crlf_not_in_name() {
        let extractor = TripletExtractor::new();
        let records = extractor.extract("SG12 999AAA ABC Co\r\n");
        assert_eq!(records[0].name, "ABC Co");
    }

    #[test]
    fn test_name_separators_trimmed_at_edges_only() {
        let extractor = TripletExtractor::new();
        let records = extractor.extract("MY01 V-2001 - | ALPHA-OMEGA | HOLDINGS  SDN\tBHD |-");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vendor_number, "V-2001");
        assert_eq!(records[0].name, "ALPHA-OMEGA | HOLDINGS SDN BHD");
    }

    #[test]
    fn test_company_code_is_case_sensitive() {
        let extractor = TripletExtractor::new();
        assert!(extractor.extract("sg77 1000338436 LOWER CASE CODE").is_empty());
        assert!(extractor.extract("Sg77 1000338436 MIXED CASE CODE").is_empty());
        assert!(extractor.extract("SGX7 1000338436 NOT A CODE").is_empty());
    }

    #[test]
    fn test_company_code_shape() {
        let extractor = TripletExtractor::new();
        let text = "SG77 1000338436 FIRST\nnoise AB12 XYZ SECOND\nABC12 1234 THIRD\nSG1 1234 FOURTH";

        let records = extractor.extract(text);

        assert_eq!(records.len(), 2);
        for record in &records {
            let code = record.company_code.as_bytes();
            assert_eq!(code.len(), 4);
            assert!(code[..2].iter().all(u8::is_ascii_uppercase));
            assert!(code[2..].iter().all(u8::is_ascii_digit));
        }
    }

    #[test]
    fn test_vendor_number_length_bounds() {
        let extractor = TripletExtractor::new();
        assert!(extractor.extract("SG77 12 TOO SHORT").is_empty());

        let forty = "9".repeat(40);
        let records = extractor.extract(&format!("SG77 {forty} EXACT FIT"));
        assert_eq!(records[0].vendor_number, forty);

        let forty_one = "9".repeat(41);
        assert!(extractor.extract(&format!("SG77 {forty_one} TOO LONG")).is_empty());
    }

    #[test]
    fn test_record_does_not_span_lines() {
        let extractor = TripletExtractor::new();
        assert!(extractor.extract("SG77\n1000338436 WRAPPED NAME").is_empty());
        assert!(extractor.extract("SG77 1000338436\nWRAPPED NAME").is_empty());
    }

    #[test]
    fn test_separator_only_name_kept_empty() {
        let extractor = TripletExtractor::new();
        assert_eq!(
            extractor.extract("SG77 1000338436 -|-"),
            vec![VendorRecord::new("SG77", "1000338436", "")]
        );
        assert_eq!(
            extractor.extract("SG77 1000338436    \nSG80 1000445566 ACME"),
            vec![
                VendorRecord::new("SG77", "1000338436", ""),
                VendorRecord::new("SG80", "1000445566", "ACME"),
            ]
        );
    }

    #[test]
    fn test_no_matches() {
        let extractor = TripletExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("Please find the vendor list attached.").is_empty());
    }
}
