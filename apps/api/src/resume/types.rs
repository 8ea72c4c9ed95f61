use serde::{Deserialize, Serialize};

/// Structured profile extracted from a résumé. Created once per successful
/// parse and embedded in the stored resume row; re-parsing creates a new
/// profile rather than patching this one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linked_in: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    pub total_years_experience: Option<u32>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub open_to_remote: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub graduation_date: Option<String>,
}

/// Outcome of one parse attempt. Extraction failures never panic past this
/// boundary: they become `success = false` with an explanatory `error` and
/// an empty-shell profile.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeParseResult {
    pub success: bool,
    pub profile: ResumeProfile,
    pub raw_text: String,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl ResumeParseResult {
    pub fn failed(error: impl Into<String>) -> Self {
        ResumeParseResult {
            success: false,
            profile: ResumeProfile::default(),
            raw_text: String::new(),
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }
}
