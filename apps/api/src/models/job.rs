use serde::{Deserialize, Serialize};

/// A job description to match candidates against. Ephemeral — constructed per
/// request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQuery {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default = "default_experience_level")]
    pub experience_level: String,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_experience_level() -> String {
    "Mid-level".to_string()
}

fn default_location() -> String {
    "Remote".to_string()
}

impl JobQuery {
    /// Flattens the query into the text that is embedded for similarity search.
    pub fn search_text(&self) -> String {
        format!(
            "Job Title: {}\n\nCompany: {}\n\nJob Description: {}",
            self.title, self.company, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"title": "Engineer", "company": "Acme", "description": "Build things"}"#;
        let job: JobQuery = serde_json::from_str(json).unwrap();
        assert_eq!(job.experience_level, "Mid-level");
        assert_eq!(job.location, "Remote");
        assert!(job.skills_required.is_empty());
    }

    #[test]
    fn test_search_text_includes_title_company_description() {
        let job = JobQuery {
            title: "Engineer".into(),
            company: "Acme".into(),
            description: "Build things".into(),
            skills_required: vec![],
            experience_level: "Senior".into(),
            location: "Remote".into(),
        };
        let text = job.search_text();
        assert!(text.contains("Engineer"));
        assert!(text.contains("Acme"));
        assert!(text.contains("Build things"));
    }
}
