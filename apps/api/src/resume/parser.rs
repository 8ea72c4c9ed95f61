//! Deterministic résumé parser: section segmentation, entity regexes, and
//! heuristic field extraction. No learned models — every rule here is a
//! plain pattern with known false-positive and false-negative modes.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;

use crate::resume::extract::{extract_text, FileType};
use crate::resume::skills::extract_all_skills;
use crate::resume::types::{
    EducationEntry, ExperienceEntry, ResumeParseResult, ResumeProfile,
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("static regex")
});
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}")
        .expect("static regex")
});
static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[a-zA-Z0-9_-]+/?")
        .expect("static regex")
});
static GITHUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[a-zA-Z0-9_-]+/?").expect("static regex")
});
static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?),?\s*([A-Z]{2})\b").expect("static regex")
});
static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{4})\s*[-–]\s*(\d{4}|present|current)").expect("static regex")
});
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("static regex"));
static PRESENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)present|current").expect("static regex"));
static REMOTE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(remote|work\s+from\s+home|wfh|distributed)\b").expect("static regex")
});

/// Section headers, matched in this order; the first hit wins. A header must
/// be a short line (< 50 chars) to avoid classifying prose that merely
/// mentions "experience".
static SECTION_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "experience",
            Regex::new(r"(?i)\b(experience|employment|work\s*history|professional\s*experience)\b")
                .expect("static regex"),
        ),
        (
            "education",
            Regex::new(r"(?i)\b(education|academic|degree|university|college)\b")
                .expect("static regex"),
        ),
        (
            "skills",
            Regex::new(r"(?i)\b(skills|technologies|technical\s*skills|competencies|expertise)\b")
                .expect("static regex"),
        ),
        (
            "summary",
            Regex::new(r"(?i)\b(summary|profile|objective|about\s*me|professional\s*summary)\b")
                .expect("static regex"),
        ),
    ]
});

static JOB_TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(senior|sr\.?|junior|jr\.?|lead|principal|staff|chief|head\s+of)\s+")
            .expect("static regex"),
        Regex::new(
            r"(?i)\b(software|frontend|backend|full[\s-]?stack|mobile|web|devops|data|ml|machine\s+learning|ai|cloud|security|qa|test|product|project|program)\s+(engineer|developer|architect|manager|designer|analyst|scientist|specialist|consultant|lead)\b",
        )
        .expect("static regex"),
    ]
});

const JARGON_KEYWORDS: &[&str] = &[
    "agile",
    "scrum",
    "ci/cd",
    "devops",
    "cloud",
    "microservices",
    "api",
    "rest",
    "graphql",
    "testing",
    "tdd",
];

const MAX_EXPERIENCE_ENTRIES: usize = 10;
const MAX_EDUCATION_ENTRIES: usize = 5;
const MAX_JOB_TITLES: usize = 10;
const MAX_KEYWORDS: usize = 50;

/// Parses an uploaded document into a structured profile. Extraction
/// failures and empty documents become `success = false` results, never
/// panics.
pub fn parse_resume(bytes: &[u8], file_type: FileType) -> ResumeParseResult {
    match extract_text(bytes, file_type) {
        Ok(raw_text) => {
            if raw_text.trim().is_empty() {
                return ResumeParseResult::failed("No text could be extracted from the file");
            }
            parse_resume_text(&raw_text)
        }
        Err(e) => ResumeParseResult::failed(format!("{e:#}")),
    }
}

/// Parses raw résumé text into a structured profile.
pub fn parse_resume_text(text: &str) -> ResumeParseResult {
    let mut warnings = Vec::new();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let email = EMAIL.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE.find(text).map(|m| m.as_str().to_string());
    let linked_in = LINKEDIN.find(text).map(|m| m.as_str().to_string());
    let github = GITHUB.find(text).map(|m| m.as_str().to_string());

    let name = extract_name(&lines);
    let location = LOCATION
        .captures(text)
        .map(|c| format!("{}, {}", &c[1], &c[2]));

    let sections = split_into_sections(text);
    let skills = extract_all_skills(text);
    if skills.is_empty() {
        warnings.push("No skills could be automatically extracted".to_string());
    }

    let experience = extract_experience(sections.get("experience").map(String::as_str).unwrap_or(text));
    let education = extract_education(sections.get("education").map(String::as_str).unwrap_or(text));
    let job_titles = extract_job_titles(text);
    let total_years_experience = estimate_years_experience(&experience);
    let keywords = build_keywords(text, &skills);
    let open_to_remote = REMOTE_HINT.is_match(text);

    let profile = ResumeProfile {
        name,
        email,
        phone,
        location,
        linked_in,
        github,
        summary: sections
            .get("summary")
            .map(|s| s.chars().take(500).collect()),
        skills,
        experience,
        total_years_experience,
        education,
        keywords,
        job_titles,
        open_to_remote,
    };

    let has_minimal_data = profile.name.is_some()
        || profile.email.is_some()
        || !profile.skills.is_empty()
        || !profile.experience.is_empty();
    if !has_minimal_data {
        warnings.push("Could not extract structured data from resume".to_string());
    }

    ResumeParseResult {
        success: has_minimal_data,
        profile,
        raw_text: text.to_string(),
        warnings,
        error: None,
    }
}

/// Best-effort name heuristic, not a named-entity extractor: the first of
/// the opening five lines that looks like neither contact info nor a
/// document title. A short non-name first line will be misidentified.
fn extract_name(lines: &[&str]) -> Option<String> {
    for line in lines.iter().take(5) {
        if EMAIL.is_match(line) || PHONE.is_match(line) || line.contains("http") {
            continue;
        }
        if line.len() <= 2 || line.len() >= 50 {
            continue;
        }
        let lower = line.to_lowercase();
        if lower.contains("resume") || lower.contains("curriculum") || lower.contains("vitae") {
            continue;
        }
        return Some(line.to_string());
    }
    None
}

/// Pure fold over lines producing section name → accumulated text. Lines
/// before the first recognized header land in an implicit "header" bucket;
/// a header seen twice (a stray "University ..." line, say) appends to the
/// existing section rather than clobbering it.
fn split_into_sections(text: &str) -> HashMap<String, String> {
    let (mut sections, last_name, last_content) = text.lines().fold(
        (HashMap::new(), "header", Vec::new()),
        |(mut sections, current_name, mut content), line| {
            let header = if line.len() < 50 {
                SECTION_PATTERNS
                    .iter()
                    .find(|(_, pattern)| pattern.is_match(line))
                    .map(|(name, _)| *name)
            } else {
                None
            };

            match header {
                Some(name) => {
                    append_section(&mut sections, current_name, &content);
                    (sections, name, Vec::new())
                }
                None => {
                    content.push(line);
                    (sections, current_name, content)
                }
            }
        },
    );
    append_section(&mut sections, last_name, &last_content);
    sections
}

fn append_section(sections: &mut HashMap<String, String>, name: &str, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    let chunk = lines.join("\n");
    sections
        .entry(name.to_string())
        .and_modify(|existing| {
            existing.push('\n');
            existing.push_str(&chunk);
        })
        .or_insert(chunk);
}

fn is_title_line(line: &str) -> bool {
    JOB_TITLE_PATTERNS.iter().any(|p| p.is_match(line))
}

/// Walks the experience section: a title-pattern line opens a new entry and
/// closes the previous one, whose description is the accumulated long lines.
fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = Vec::new();
    let mut current: Option<ExperienceEntry> = None;
    let mut description_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_title_line(trimmed) {
            if let Some(mut entry) = current.take() {
                entry.description = Some(description_lines.join(" ").trim().to_string());
                entries.push(entry);
            }
            let mut entry = ExperienceEntry {
                title: Some(trimmed.chars().take(100).collect()),
                current: PRESENT.is_match(trimmed),
                ..Default::default()
            };
            if let Some(caps) = DATE_RANGE.captures(trimmed) {
                entry.start_date = Some(caps[1].to_string());
                entry.end_date = Some(if caps[2].eq_ignore_ascii_case("present") {
                    "Present".to_string()
                } else {
                    caps[2].to_string()
                });
            }
            current = Some(entry);
            description_lines.clear();
        } else if current.is_some() && trimmed.len() > 20 {
            description_lines.push(trimmed);
        }
    }

    if let Some(mut entry) = current {
        entry.description = Some(description_lines.join(" ").trim().to_string());
        entries.push(entry);
    }

    entries.truncate(MAX_EXPERIENCE_ENTRIES);
    entries
}

static DEGREE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(Bachelor(?:'s)?|B\.?S\.?|B\.?A\.?)\b").expect("static regex"),
        Regex::new(r"(?i)\b(Master(?:'s)?|M\.?S\.?|M\.?A\.?|MBA)\b").expect("static regex"),
        Regex::new(r"(?i)\b(Ph\.?D\.?|Doctor(?:ate)?)\b").expect("static regex"),
    ]
});

fn extract_education(text: &str) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        for pattern in DEGREE_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                entries.push(EducationEntry {
                    degree: Some(caps[1].to_string()),
                    graduation_date: YEAR.find(line).map(|m| m.as_str().to_string()),
                });
                break;
            }
        }
    }
    entries.truncate(MAX_EDUCATION_ENTRIES);
    entries
}

/// Applies the title-line patterns résumé-wide and collects distinct
/// matches within length bounds. Both patterns are tried per line, so a
/// line like "Senior Software Engineer" contributes its seniority prefix
/// and the role noun match.
fn extract_job_titles(text: &str) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        for pattern in JOB_TITLE_PATTERNS.iter() {
            if let Some(m) = pattern.find(trimmed) {
                let matched = m.as_str().trim().to_string();
                if m.as_str().len() > 3 && m.as_str().len() < 50 && !titles.contains(&matched) {
                    titles.push(matched);
                }
            }
        }
    }
    titles.truncate(MAX_JOB_TITLES);
    titles
}

/// Sums whole-year spans across entries with a parseable start year; open
/// ranges ("Present") run to the current year. Implausible totals (outside
/// 1..=49) are discarded.
fn estimate_years_experience(experience: &[ExperienceEntry]) -> Option<u32> {
    if experience.is_empty() {
        return None;
    }
    let current_year = Utc::now().year();
    let mut total_months = 0i32;

    for entry in experience {
        let start_year = entry.start_date.as_deref().and_then(|s| s.parse::<i32>().ok());
        let end_year = match entry.end_date.as_deref() {
            None | Some("Present") => Some(current_year),
            Some(other) => other.parse::<i32>().ok(),
        };
        if let (Some(start), Some(end)) = (start_year, end_year) {
            total_months += ((end - start) * 12).max(0);
        }
    }

    let years = (total_months as f64 / 12.0).round() as i32;
    (years > 0 && years < 50).then_some(years as u32)
}

/// Keyword set: extracted skills plus any fixed technical-jargon term found
/// as a substring of the lowercased text.
fn build_keywords(text: &str, skills: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for skill in skills {
        let lower = skill.to_lowercase();
        if !keywords.contains(&lower) {
            keywords.push(lower);
        }
    }

    let text_lower = text.to_lowercase();
    for jargon in JARGON_KEYWORDS {
        if text_lower.contains(jargon) && !keywords.contains(&jargon.to_string()) {
            keywords.push(jargon.to_string());
        }
    }

    keywords.truncate(MAX_KEYWORDS);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "
John Doe
john.doe@email.com
(555) 123-4567
San Francisco, CA
linkedin.com/in/johndoe
github.com/johndoe

Summary
Senior software engineer with 8+ years of experience building scalable web applications.

Experience
Senior Software Engineer - TechCorp Inc
2020 - Present
• Led development of microservices architecture
• Implemented CI/CD pipelines with GitHub Actions
• Mentored junior developers

Software Engineer - StartupXYZ
2016 - 2020
• Built React frontend applications
• Developed Node.js backend services
• Worked with PostgreSQL and Redis

Education
Master of Science in Computer Science
University of California, Berkeley
2016

Skills
JavaScript, TypeScript, React, Node.js, Python, AWS, Docker, Kubernetes, PostgreSQL
";

    #[test]
    fn test_extracts_name() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(result.profile.name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_extracts_email() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(result.profile.email.as_deref(), Some("john.doe@email.com"));
    }

    #[test]
    fn test_extracts_phone() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(result.profile.phone.unwrap().contains("555"));
    }

    #[test]
    fn test_extracts_location() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert_eq!(result.profile.location.as_deref(), Some("San Francisco, CA"));
    }

    #[test]
    fn test_extracts_links() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(result.profile.linked_in.unwrap().contains("linkedin.com/in/johndoe"));
        assert!(result.profile.github.unwrap().contains("github.com/johndoe"));
    }

    #[test]
    fn test_extracts_skills() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(result.profile.skills.len() > 5);
        assert!(result.profile.skills.contains(&"javascript".to_string()));
        assert!(result.profile.skills.contains(&"react".to_string()));
        assert!(result.profile.skills.contains(&"aws".to_string()));
    }

    #[test]
    fn test_extracts_experience_entries() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(!result.profile.experience.is_empty());
        let first = &result.profile.experience[0];
        assert!(first.title.as_deref().unwrap().contains("Senior Software Engineer"));
    }

    #[test]
    fn test_extracts_education() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(!result.profile.education.is_empty());
        assert!(result.profile.education[0]
            .degree
            .as_deref()
            .unwrap()
            .contains("Master"));
    }

    #[test]
    fn test_success_for_valid_resume() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(result.success);
    }

    #[test]
    fn test_generates_keywords() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(!result.profile.keywords.is_empty());
    }

    #[test]
    fn test_empty_text_fails_without_panic() {
        let result = parse_resume_text("");
        assert!(!result.success);
        assert!(result.profile.skills.is_empty());
        assert!(result.profile.experience.is_empty());
        assert!(result.profile.education.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Could not extract structured data")));
    }

    #[test]
    fn test_sections_fold_splits_on_short_headers() {
        let sections = split_into_sections(SAMPLE_RESUME);
        assert!(sections.contains_key("header"));
        assert!(sections.contains_key("experience"));
        assert!(sections.contains_key("education"));
        assert!(sections["experience"].contains("TechCorp"));
    }

    #[test]
    fn test_long_line_mentioning_experience_is_not_a_header() {
        let text = "Header\nI have a great deal of experience with many things, truly a lot of it\nmore";
        let sections = split_into_sections(text);
        assert!(!sections.contains_key("experience"));
    }

    #[test]
    fn test_date_ranges_captured_from_title_lines() {
        let text = "Experience\nSenior Engineer at Acme 2018 - 2021\nBuilt large distributed systems for clients\n";
        let entries = extract_experience(text);
        assert_eq!(entries[0].start_date.as_deref(), Some("2018"));
        assert_eq!(entries[0].end_date.as_deref(), Some("2021"));
        assert!(!entries[0].current);
    }

    #[test]
    fn test_present_range_marks_current() {
        let entries = extract_experience("Lead Developer 2022 - present\n");
        assert_eq!(entries[0].end_date.as_deref(), Some("Present"));
        assert!(entries[0].current);
    }

    #[test]
    fn test_years_estimate_sums_ranges() {
        let entries = vec![
            ExperienceEntry {
                start_date: Some("2016".to_string()),
                end_date: Some("2020".to_string()),
                ..Default::default()
            },
            ExperienceEntry {
                start_date: Some("2020".to_string()),
                end_date: Some("2023".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(estimate_years_experience(&entries), Some(7));
    }

    #[test]
    fn test_years_estimate_discards_implausible_totals() {
        let entries = vec![ExperienceEntry {
            start_date: Some("1900".to_string()),
            end_date: Some("2000".to_string()),
            ..Default::default()
        }];
        assert_eq!(estimate_years_experience(&entries), None);
    }

    #[test]
    fn test_name_heuristic_skips_document_titles() {
        let text = "Curriculum Vitae\nJane Smith\njane@example.com";
        let result = parse_resume_text(text);
        assert_eq!(result.profile.name.as_deref(), Some("Jane Smith"));
    }

    #[test]
    fn test_remote_preference_flag() {
        let result = parse_resume_text("Jane Smith\nOpen to remote work.\n");
        assert!(result.profile.open_to_remote);
        let result = parse_resume_text("Jane Smith\nPrefers an office.\n");
        assert!(!result.profile.open_to_remote);
    }

    #[test]
    fn test_job_titles_deduplicated_and_bounded() {
        let result = parse_resume_text(SAMPLE_RESUME);
        let titles = &result.profile.job_titles;
        assert!(titles.len() <= 10);
        assert!(titles.iter().any(|t| t.contains("Software Engineer")));
        let mut deduped = titles.clone();
        deduped.dedup();
        assert_eq!(&deduped, titles);
    }

    #[test]
    fn test_keywords_include_jargon_terms() {
        let result = parse_resume_text(SAMPLE_RESUME);
        assert!(result.profile.keywords.contains(&"microservices".to_string()));
        assert!(result.profile.keywords.len() <= 50);
    }
}
