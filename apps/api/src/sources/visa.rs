//! Pattern-based visa sponsorship classifier over free text.
//!
//! The NO set is evaluated in full before the YES set: a posting that says
//! "we cannot sponsor" anywhere classifies as `no` even if it also mentions
//! sponsorship positively. That precedence is a correctness requirement.

use std::sync::LazyLock;

use regex::Regex;

use crate::sources::VisaSponsorship;

static VISA_YES_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"visa\s+sponsor",
        r"will\s+sponsor",
        r"sponsorship\s+available",
        r"sponsorship\s+provided",
        r"sponsor\s+visa",
        r"h1b\s+sponsor",
        r"h-1b\s+sponsor",
        r"immigration\s+sponsor",
        r"work\s+authorization\s+sponsor",
        r"we\s+sponsor",
        r"offers?\s+sponsorship",
        r"provides?\s+sponsorship",
        r"open\s+to\s+sponsor",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static visa pattern"))
    .collect()
});

static VISA_NO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"no\s+visa\s+sponsor",
        r"not\s+sponsor",
        r"cannot\s+sponsor",
        r"can't\s+sponsor",
        r"won't\s+sponsor",
        r"will\s+not\s+sponsor",
        r"unable\s+to\s+sponsor",
        r"sponsorship\s+not\s+available",
        r"no\s+sponsorship",
        r"without\s+sponsor",
        r"must\s+be\s+authorized",
        r"must\s+have\s+work\s+authorization",
        r"authorized\s+to\s+work.*without\s+sponsor",
        r"no\s+h1b",
        r"no\s+h-1b",
        r"us\s+citizen.*only",
        r"citizens?\s+only",
        r"permanent\s+resident.*only",
        r"green\s+card.*required",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static visa pattern"))
    .collect()
});

/// Classifies free text as yes/no/unknown for visa sponsorship.
pub fn infer_visa_sponsorship(text: &str) -> VisaSponsorship {
    if text.is_empty() {
        return VisaSponsorship::Unknown;
    }
    let normalized = text.to_lowercase();

    if VISA_NO_PATTERNS.iter().any(|p| p.is_match(&normalized)) {
        return VisaSponsorship::No;
    }
    if VISA_YES_PATTERNS.iter().any(|p| p.is_match(&normalized)) {
        return VisaSponsorship::Yes;
    }
    VisaSponsorship::Unknown
}

/// Classifies a posting from its combined title + description + snippet.
pub fn infer_visa_from_posting(
    title: &str,
    description: Option<&str>,
    snippet: Option<&str>,
) -> VisaSponsorship {
    let combined = [title, description.unwrap_or(""), snippet.unwrap_or("")].join(" ");
    infer_visa_sponsorship(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_patterns() {
        let samples = [
            "We offer visa sponsorship for qualified candidates",
            "H1B sponsorship available",
            "Will sponsor visa for the right candidate",
            "Sponsorship provided for this position",
            "We sponsor H-1B visas",
            "Immigration sponsorship available",
            "Open to sponsor qualified candidates",
            "Company provides sponsorship",
        ];
        for text in samples {
            assert_eq!(infer_visa_sponsorship(text), VisaSponsorship::Yes, "{text}");
        }
    }

    #[test]
    fn test_no_patterns() {
        let samples = [
            "No visa sponsorship available",
            "Cannot sponsor visas at this time",
            "We will not sponsor for this position",
            "Must be authorized to work in the US",
            "US citizens only",
            "Green card required",
            "Unable to sponsor work visas",
            "No H1B sponsorship",
            "Sponsorship not available for this role",
            "Permanent resident only",
        ];
        for text in samples {
            assert_eq!(infer_visa_sponsorship(text), VisaSponsorship::No, "{text}");
        }
    }

    #[test]
    fn test_ambiguous_text_is_unknown() {
        let samples = [
            "Great opportunity for engineers",
            "Join our team and build amazing products",
            "Competitive salary and benefits",
            "",
        ];
        for text in samples {
            assert_eq!(
                infer_visa_sponsorship(text),
                VisaSponsorship::Unknown,
                "{text}"
            );
        }
    }

    #[test]
    fn test_no_takes_precedence_over_yes() {
        let text = "We cannot sponsor visas. Previously we did sponsor H1B.";
        assert_eq!(infer_visa_sponsorship(text), VisaSponsorship::No);
    }

    #[test]
    fn test_posting_combines_all_fields() {
        assert_eq!(
            infer_visa_from_posting(
                "Software Engineer",
                Some("We offer visa sponsorship for qualified candidates."),
                Some("Great opportunity"),
            ),
            VisaSponsorship::Yes
        );
        assert_eq!(
            infer_visa_from_posting(
                "Data Scientist",
                None,
                Some("H1B sponsorship available for this role."),
            ),
            VisaSponsorship::Yes
        );
        assert_eq!(
            infer_visa_from_posting("Senior Developer", None, None),
            VisaSponsorship::Unknown
        );
    }
}
