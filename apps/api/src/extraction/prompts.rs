// All LLM prompt constants for the extraction module.

/// System prompt for candidate field extraction — forbids inference and
/// enforces JSON-only output.
pub const INFO_EXTRACT_SYSTEM: &str =
    "You are an expert resume parser. Extract key information from resume text. \
    Extract only what is actually in the text - do not make assumptions or add \
    information not present. If information is missing, leave those fields empty or null. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";

/// Field extraction prompt template. Replace `{resume_text}` before sending.
pub const INFO_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the following information from this resume:

{resume_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "candidate_name": "Full name, or null if not present",
  "email": "Email address, or null",
  "phone": "Phone number, or null",
  "skills": ["skill", "skill"],
  "experience": [
    {"company": "Company name", "title": "Job title", "duration": "Date range", "description": "What they did"}
  ],
  "education": [
    {"institution": "School name", "degree": "Degree earned", "graduation_year": "Year"}
  ]
}

List experience and education in the order they appear in the resume."#;

/// Prompt for the vision fallback when the native text layer is unusable.
pub const VISION_EXTRACT_PROMPT: &str =
    "Extract all text content from this resume document in plain text format. \
    Include all details you can see. Return only the extracted text.";
