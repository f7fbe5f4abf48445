use serde::{Deserialize, Serialize};

/// One work-history entry as extracted from resume text, chronological order
/// preserved from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub graduation_year: String,
}

/// Structured candidate fields extracted from resume text by the model.
///
/// Every field is default-tolerant: the extraction prompt forbids inference,
/// so absent information deserializes to `None` / empty rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

impl CandidateInfo {
    /// Fixed fallback record substituted when model extraction fails.
    /// Ingestion continues with degraded metadata rather than stalling.
    pub fn placeholder() -> Self {
        CandidateInfo {
            candidate_name: Some("Unknown".to_string()),
            email: None,
            phone: None,
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.candidate_name.as_deref().unwrap_or("Unknown")
    }
}
