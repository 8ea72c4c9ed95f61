//! Tokenization, stopword filtering, and set-similarity primitives shared by
//! the scorer.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

const STOPWORD_LIST: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "it", "its", "this", "that", "these", "those",
    "what", "which", "who", "we", "you", "he", "she", "they", "i", "me", "him", "her", "us",
    "them", "if", "then", "else", "when", "where", "why", "how", "all", "each", "every",
];

/// Seniority and modality words stripped from job titles before comparison,
/// so "Senior Frontend Engineer" and "Frontend Engineer" compare equal.
const TITLE_STOPWORD_LIST: &[&str] = &[
    "senior",
    "junior",
    "jr",
    "sr",
    "lead",
    "principal",
    "staff",
    "associate",
    "entry",
    "level",
    "mid",
    "intern",
    "remote",
    "hybrid",
    "onsite",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORD_LIST.iter().copied().collect());

static TITLE_STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| TITLE_STOPWORD_LIST.iter().copied().collect());

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Lowercases, maps punctuation to spaces, and collapses whitespace.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let depunctuated = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&depunctuated, " ").trim().to_string()
}

/// Splits normalized text into tokens longer than one character, optionally
/// dropping stopwords.
pub fn tokenize(text: &str, remove_stopwords: bool) -> Vec<String> {
    normalize_text(text)
        .split(' ')
        .filter(|t| t.len() > 1)
        .filter(|t| !remove_stopwords || !STOPWORDS.contains(t))
        .map(String::from)
        .collect()
}

/// Tokenizes a job title with the additional seniority/modifier filter.
pub fn tokenize_title(title: &str) -> Vec<String> {
    tokenize(title, true)
        .into_iter()
        .filter(|t| !TITLE_STOPWORDS.contains(t.as_str()))
        .collect()
}

pub fn jaccard_similarity(set1: &HashSet<String>, set2: &HashSet<String>) -> f64 {
    if set1.is_empty() && set2.is_empty() {
        return 1.0;
    }
    if set1.is_empty() || set2.is_empty() {
        return 0.0;
    }
    let intersection = set1.intersection(set2).count();
    let union = set1.union(set2).count();
    intersection as f64 / union as f64
}

pub fn overlap_coefficient(set1: &HashSet<String>, set2: &HashSet<String>) -> f64 {
    if set1.is_empty() || set2.is_empty() {
        return 0.0;
    }
    let intersection = set1.intersection(set2).count();
    intersection as f64 / set1.len().min(set2.len()) as f64
}

/// Case-insensitive intersection, preserving the order of the first slice.
pub fn find_intersection(arr1: &[String], arr2: &[String]) -> Vec<String> {
    let set2: HashSet<String> = arr2.iter().map(|s| s.to_lowercase()).collect();
    arr1.iter()
        .filter(|s| set2.contains(&s.to_lowercase()))
        .cloned()
        .collect()
}

/// Case-insensitive difference (arr1 minus arr2), preserving order.
pub fn find_difference(arr1: &[String], arr2: &[String]) -> Vec<String> {
    let set2: HashSet<String> = arr2.iter().map(|s| s.to_lowercase()).collect();
    arr1.iter()
        .filter(|s| !set2.contains(&s.to_lowercase()))
        .cloned()
        .collect()
}

/// Top 30 most-frequent tokens of length ≥ 3 (stopwords removed), ranked by
/// frequency descending with first-seen order breaking ties.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let tokens = tokenize(text, true);
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for token in tokens {
        if token.len() >= 3 {
            if !counts.contains_key(&token) {
                first_seen.push(token.clone());
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let order: HashMap<&str, usize> = first_seen
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let mut ranked: Vec<String> = first_seen.clone();
    ranked.sort_by(|a, b| {
        counts[b]
            .cmp(&counts[a])
            .then_with(|| order[a.as_str()].cmp(&order[b.as_str()]))
    });
    ranked.truncate(30);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_text("Hello World"), "hello world");
    }

    #[test]
    fn test_normalize_removes_punctuation() {
        assert_eq!(normalize_text("Hello, World!"), "hello world");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("hello   world"), "hello world");
    }

    #[test]
    fn test_tokenize_removes_stopwords_by_default() {
        let tokens = tokenize("the quick brown fox and the lazy dog", true);
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"and".to_string()));
        assert!(tokens.contains(&"quick".to_string()));
        assert!(tokens.contains(&"brown".to_string()));
    }

    #[test]
    fn test_tokenize_keeps_stopwords_when_requested() {
        let tokens = tokenize("the quick brown fox", false);
        assert!(tokens.contains(&"the".to_string()));
    }

    #[test]
    fn test_tokenize_title_strips_seniority() {
        let tokens = tokenize_title("Senior Frontend Engineer");
        assert_eq!(tokens, vec!["frontend", "engineer"]);
    }

    #[test]
    fn test_jaccard_identical_sets() {
        let s = set(&["a", "b", "c"]);
        assert_eq!(jaccard_similarity(&s, &s), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint_sets() {
        assert_eq!(jaccard_similarity(&set(&["a", "b"]), &set(&["c", "d"])), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // intersection {b}, union {a, b, c}
        let sim = jaccard_similarity(&set(&["a", "b"]), &set(&["b", "c"]));
        assert!((sim - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_empty_sets() {
        let empty = HashSet::new();
        assert_eq!(jaccard_similarity(&empty, &empty), 1.0);
        assert_eq!(jaccard_similarity(&empty, &set(&["a"])), 0.0);
    }

    #[test]
    fn test_overlap_subset_is_one() {
        assert_eq!(
            overlap_coefficient(&set(&["a", "b"]), &set(&["a", "b", "c", "d"])),
            1.0
        );
    }

    #[test]
    fn test_overlap_partial() {
        assert_eq!(overlap_coefficient(&set(&["a", "b"]), &set(&["a", "c"])), 0.5);
    }

    #[test]
    fn test_intersection_is_case_insensitive() {
        let arr1 = vec!["React".to_string(), "Go".to_string()];
        let arr2 = vec!["react".to_string()];
        assert_eq!(find_intersection(&arr1, &arr2), vec!["React".to_string()]);
    }

    #[test]
    fn test_difference_is_case_insensitive() {
        let arr1 = vec!["React".to_string(), "Go".to_string()];
        let arr2 = vec!["react".to_string()];
        assert_eq!(find_difference(&arr1, &arr2), vec!["Go".to_string()]);
    }

    #[test]
    fn test_extract_keywords_ranks_by_frequency() {
        let keywords = extract_keywords("rust rust rust python python java");
        assert_eq!(keywords[0], "rust");
        assert_eq!(keywords[1], "python");
        assert_eq!(keywords[2], "java");
    }

    #[test]
    fn test_extract_keywords_skips_short_tokens() {
        let keywords = extract_keywords("go go go database");
        assert_eq!(keywords, vec!["database".to_string()]);
    }

    #[test]
    fn test_extract_keywords_caps_at_thirty() {
        let text = (0..40)
            .map(|i| format!("keyword{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(extract_keywords(&text).len(), 30);
    }

    #[test]
    fn test_extract_keywords_ties_break_by_first_seen() {
        let keywords = extract_keywords("zeta alpha zeta alpha");
        assert_eq!(keywords, vec!["zeta".to_string(), "alpha".to_string()]);
    }
}
