use regex::{Captures, Regex};

/// Light markup to text transform, good enough for pattern matching on
/// message bodies that only come as HTML.
///
/// Line breaks and closing paragraphs become newlines, every other tag turns
/// into a single space. Never fails: anything that looks like a tag is dropped.
pub struct HtmlTextNormalizer {
    line_break: Regex,
    paragraph_close: Regex,
    paragraph_open: Regex,
    any_tag: Regex,
    entity: Regex,
    horizontal_space: Regex,
}

impl HtmlTextNormalizer {
    pub fn new() -> Self {
        Self {
            line_break: Regex::new(r"(?i)<\s*br\s*/?\s*>").unwrap(),
            paragraph_close: Regex::new(r"(?i)<\s*/\s*p\s*>").unwrap(),
            paragraph_open: Regex::new(r"(?i)<\s*p(?:\s[^>]*)?>").unwrap(),
            any_tag: Regex::new(r"<[^>]+>").unwrap(),
            entity: Regex::new(r"&(nbsp|amp|lt|gt|quot|apos|#39);").unwrap(),
            horizontal_space: Regex::new(r"[^\S\n]+").unwrap(),
        }
    }

    pub fn to_plain_text(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        let text = self.line_break.replace_all(html, "\n");
        let text = self.paragraph_close.replace_all(&text, "\n");
        let text = self.paragraph_open.replace_all(&text, "");
        let text = self.any_tag.replace_all(&text, " ");
        let text = self.entity.replace_all(&text, |caps: &Captures| {
            match &caps[1] {
                "nbsp" => " ",
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                _ => "'",
            }
            .to_string()
        });
        let text = self.horizontal_space.replace_all(&text, " ");

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for HtmlTextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
