//! OutreachComposer — recruiter-facing email and LinkedIn copy.
//!
//! Pure prompt templating over the generative model, plus the parsing that
//! splits a single model reply into an email (subject + body) and a LinkedIn
//! message.

pub mod handlers;
pub mod prompts;

use serde::Serialize;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::outreach::prompts::{engage_prompt, engage_system, EngageContext};

/// Which communication is being drafted. Drives tone and call-to-action in
/// the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutreachKind {
    /// Interview invitation for a suitable candidate.
    Invitation,
    /// Polite rejection.
    Rejection,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutreachBundle {
    pub email: EmailDraft,
    pub linkedin_message: String,
}

/// Drafts one email + LinkedIn message pair with a single model call.
pub async fn compose(
    llm: &LlmClient,
    kind: OutreachKind,
    ctx: &EngageContext<'_>,
) -> Result<OutreachBundle, AppError> {
    let content = llm
        .generate(&engage_prompt(kind, ctx), &engage_system(kind, ctx), 0.7, 2048)
        .await
        .map_err(|e| AppError::Llm(format!("outreach drafting failed: {e}")))?;

    Ok(split_reply(&content))
}

/// Splits a model reply into its email and LinkedIn halves. The prompt asks
/// for `---` between them and a `LinkedIn Message:` label; both are treated
/// as optional since the model does not always comply.
pub(crate) fn split_reply(content: &str) -> OutreachBundle {
    let (email_part, linkedin_message) = match content.split_once("\n---") {
        Some((email, rest)) => {
            let rest = rest.trim_start_matches('-').trim();
            let message = match rest.split_once("LinkedIn Message:") {
                Some((_, m)) => m.trim().to_string(),
                None => rest.to_string(),
            };
            (email.trim(), message)
        }
        None => (
            content.trim(),
            "Could not generate LinkedIn message.".to_string(),
        ),
    };

    OutreachBundle {
        email: split_subject(email_part),
        linkedin_message,
    }
}

/// Extracts the subject line from an email draft. The first line is the
/// subject, with an optional `Subject:` prefix; the rest is the body.
pub(crate) fn split_subject(email: &str) -> EmailDraft {
    let (first_line, rest) = match email.split_once('\n') {
        Some((line, rest)) => (line, rest.trim().to_string()),
        None => (email, String::new()),
    };

    let subject = first_line
        .trim()
        .strip_prefix("Subject:")
        .or_else(|| first_line.trim().strip_prefix("subject:"))
        .unwrap_or(first_line)
        .trim()
        .to_string();

    let body = if rest.is_empty() {
        email.to_string()
    } else {
        rest
    };

    EmailDraft { subject, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = "Subject: Exciting Opportunity at Acme\n\nDear Jane,\n\nWe were impressed by your background.\n\nBest,\nSam\n---\nLinkedIn Message: Hi Jane, I came across your profile and would love to connect about a role at Acme.";

    #[test]
    fn test_split_reply_full_shape() {
        let bundle = split_reply(FULL_REPLY);
        assert_eq!(bundle.email.subject, "Exciting Opportunity at Acme");
        assert!(bundle.email.body.starts_with("Dear Jane"));
        assert!(bundle.linkedin_message.starts_with("Hi Jane"));
    }

    #[test]
    fn test_split_reply_without_separator() {
        let bundle = split_reply("Subject: Hello\n\nJust the email body.");
        assert_eq!(bundle.email.subject, "Hello");
        assert_eq!(bundle.email.body, "Just the email body.");
        assert_eq!(
            bundle.linkedin_message,
            "Could not generate LinkedIn message."
        );
    }

    #[test]
    fn test_split_reply_separator_without_label() {
        let bundle = split_reply("Subject: Hi\n\nBody here.\n---\nShort connection note.");
        assert_eq!(bundle.linkedin_message, "Short connection note.");
    }

    #[test]
    fn test_split_subject_without_prefix() {
        let draft = split_subject("An unlabelled subject line\nBody text");
        assert_eq!(draft.subject, "An unlabelled subject line");
        assert_eq!(draft.body, "Body text");
    }

    #[test]
    fn test_split_subject_single_line() {
        let draft = split_subject("Subject: Only a subject");
        assert_eq!(draft.subject, "Only a subject");
        // No separate body: fall back to the full content
        assert_eq!(draft.body, "Subject: Only a subject");
    }
}
