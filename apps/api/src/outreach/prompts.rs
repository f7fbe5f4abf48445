//! Prompt construction for outreach drafting.

use crate::outreach::OutreachKind;

/// Everything the prompts need about the candidate, job, and recruiter.
#[derive(Debug, Clone)]
pub struct EngageContext<'a> {
    pub candidate_name: &'a str,
    pub job_title: &'a str,
    pub job_description: &'a str,
    pub company_name: &'a str,
    pub recruiter_name: &'a str,
    pub match_score: f64,
}

pub fn engage_system(kind: OutreachKind, ctx: &EngageContext<'_>) -> String {
    let (email_type, fit_point, action_point) = match kind {
        OutreachKind::Invitation => (
            "positive interview invitation",
            "Briefly explain the job opportunity and why they're a good fit",
            "Include a clear call to action for scheduling an interview",
        ),
        OutreachKind::Rejection => (
            "polite rejection",
            "Be kind but clear that they are not being moved forward",
            "Thank them for their time and interest",
        ),
    };

    format!(
        "You are an expert HR recruiter crafting personalized communications to candidates. \
        Draft both a professional email and a LinkedIn message.\n\
        You are writing a {email_type} communication.\n\
        Guidelines for the email:\n\
        1. Be concise and respectful of the recipient's time\n\
        2. Personalize the message based on the candidate's name\n\
        3. {fit_point}\n\
        4. {action_point}\n\
        5. Use a professional and friendly tone\n\
        6. Do not use generic templates - make it specific to this scenario\n\
        7. Do not use markdown formatting\n\
        For the LinkedIn message: be much shorter than the email, slightly more \
        conversational, and include a brief introduction about yourself and the company.\n\
        Current recruiter: {recruiter}\n\
        Company: {company}",
        recruiter = ctx.recruiter_name,
        company = ctx.company_name,
    )
}

pub fn engage_prompt(kind: OutreachKind, ctx: &EngageContext<'_>) -> String {
    let fit_statement = match kind {
        OutreachKind::Invitation => {
            "Our analysis shows this candidate is a strong match for the position."
        }
        OutreachKind::Rejection => {
            "While the candidate has merit, they are not the best fit for this specific role."
        }
    };

    format!(
        "Draft the following communications for:\n\n\
        Candidate Name: {candidate}\n\
        Job Title: {title}\n\
        Match Score: {score}%\n\n\
        Job Description:\n{description}\n\n\
        {fit_statement}\n\n\
        First, create an email:\n\
        Start with \"Subject: [Your email subject]\"\n\
        Then skip a line and write the email body.\n\n\
        After the complete email, add \"---\" on a separate line, then write:\n\
        \"LinkedIn Message:\" followed by a short LinkedIn message for this scenario.",
        candidate = ctx.candidate_name,
        title = ctx.job_title,
        score = ctx.match_score,
        description = ctx.job_description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EngageContext<'static> {
        EngageContext {
            candidate_name: "Jane Roe",
            job_title: "Engineer",
            job_description: "Build things",
            company_name: "Acme",
            recruiter_name: "Sam",
            match_score: 78.0,
        }
    }

    #[test]
    fn test_invitation_system_mentions_interview() {
        let system = engage_system(OutreachKind::Invitation, &ctx());
        assert!(system.contains("interview"));
        assert!(system.contains("Acme"));
        assert!(system.contains("Sam"));
    }

    #[test]
    fn test_rejection_system_mentions_not_moved_forward() {
        let system = engage_system(OutreachKind::Rejection, &ctx());
        assert!(system.contains("not being moved forward"));
    }

    #[test]
    fn test_prompt_embeds_candidate_and_score() {
        let prompt = engage_prompt(OutreachKind::Invitation, &ctx());
        assert!(prompt.contains("Jane Roe"));
        assert!(prompt.contains("78%"));
        assert!(prompt.contains("strong match"));
    }
}
