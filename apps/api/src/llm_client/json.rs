//! Resilient JSON recovery from free-form model text.
//!
//! Models asked for JSON still wrap it in markdown fences or surround it with
//! chatter. Recovery is two passes: strip fences, then scan for the first
//! brace-balanced object. The scanner is string- and escape-aware, so braces
//! inside string values do not truncate the object.

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the first brace-balanced JSON object substring, or `None` when the
/// text contains no complete object (no `{`, or the object is truncated).
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_plain_object() {
        assert_eq!(
            extract_json_object(r#"{"a": 1}"#),
            Some(r#"{"a": 1}"#)
        );
    }

    #[test]
    fn test_extract_tolerates_chatter() {
        let input = r#"Sure! Here is the JSON you asked for: {"a": 1} Hope that helps."#;
        assert_eq!(extract_json_object(input), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_nested_objects() {
        let input = r#"prefix {"outer": {"inner": [1, 2]}} suffix"#;
        assert_eq!(
            extract_json_object(input),
            Some(r#"{"outer": {"inner": [1, 2]}}"#)
        );
    }

    #[test]
    fn test_extract_braces_inside_strings() {
        // A naive first-{/last-} slice would mishandle this
        let input = r#"{"summary": "uses {braces} and \"quotes\" freely"} trailing }"#;
        assert_eq!(
            extract_json_object(input),
            Some(r#"{"summary": "uses {braces} and \"quotes\" freely"}"#)
        );
    }

    #[test]
    fn test_extract_no_object_returns_none() {
        assert_eq!(extract_json_object("no json here"), None);
    }

    #[test]
    fn test_extract_truncated_object_returns_none() {
        assert_eq!(extract_json_object(r#"{"a": {"b": 1}"#), None);
    }

    #[test]
    fn test_extract_recovered_object_parses() {
        let input = "```json\n{\"match_score\": 72.5, \"summary\": \"ok\"}\n```";
        let cleaned = strip_code_fences(input);
        let object = extract_json_object(cleaned).unwrap();
        let value: serde_json::Value = serde_json::from_str(object).unwrap();
        assert_eq!(value["match_score"], 72.5);
    }
}
