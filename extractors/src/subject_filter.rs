use shared_types::SubjectFilter;

/// Subject line heuristics compiled from a [`SubjectFilter`].
///
/// Keywords and phrases are lower-cased once; blank and repeated entries are
/// dropped so every keyword counts at most once. A blank phrase therefore
/// never matches, unlike a plain substring test where `""` matches every
/// subject.
#[derive(Debug, Clone)]
pub struct SubjectClassifier {
    keywords: Vec<String>,
    phrases: Vec<String>,
    min_keyword_hits: usize,
}

impl SubjectClassifier {
    pub fn new(filter: &SubjectFilter) -> Self {
        Self {
            keywords: normalize_terms(&filter.keywords),
            phrases: normalize_terms(&filter.phrases),
            min_keyword_hits: filter.min_keyword_hits,
        }
    }

    /// A missing subject is treated as empty.
    pub fn matches(&self, subject: Option<&str>) -> bool {
        let subject = subject.unwrap_or("").to_lowercase();

        if self.phrases.iter().any(|phrase| subject.contains(phrase.as_str())) {
            return true;
        }

        let hits = self
            .keywords
            .iter()
            .filter(|keyword| subject.contains(keyword.as_str()))
            .count();

        hits >= self.min_keyword_hits
    }
}

impl Default for SubjectClassifier {
    fn default() -> Self {
        Self::new(&SubjectFilter::default())
    }
}

pub fn subject_matches(subject: Option<&str>, filter: &SubjectFilter) -> bool {
    SubjectClassifier::new(filter).matches(subject)
}

fn normalize_terms(terms: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        if term.trim().is_empty() {
            continue;
        }
        let term = term.to_lowercase();
        if !normalized.contains(&term) {
            normalized.push(term);
        }
    }
    normalized
}
