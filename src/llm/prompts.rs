//! Prompt construction for generated resume bullets

/// Fixed instruction sent with every rewrite request
pub const REWRITE_INSTRUCTION: &str = r#"You are an experienced technical recruiter who optimizes resumes for applicant tracking systems.
Write exactly ONE resume bullet point that demonstrates the skill below.
The bullet must:
- be ATS-friendly and use the skill name verbatim
- start with a strong action verb
- include a measurable impact where possible
- be a single sentence without a leading bullet character
Return only the bullet text."#;

const REWRITE_TEMPLATE: &str = r#"{instruction}

Skill: {skill}

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>"#;

/// Render the request for one skill, clipping the job context to `max_context_chars`
pub fn render_rewrite_prompt(skill: &str, job_description: &str, max_context_chars: usize) -> String {
    let job: String = job_description.trim().chars().take(max_context_chars).collect();

    REWRITE_TEMPLATE
        .replace("{instruction}", REWRITE_INSTRUCTION)
        .replace("{skill}", skill)
        .replace("{job}", &job)
}

/// Model output often comes back quoted or prefixed with a bullet marker
pub fn clean_generated_bullet(raw: &str) -> String {
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    first_line
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•') || c.is_whitespace())
        .trim_matches('"')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_skill_and_job() {
        let prompt = render_rewrite_prompt("docker", "We ship containers to production.", 2000);
        assert!(prompt.starts_with(REWRITE_INSTRUCTION));
        assert!(prompt.contains("Skill: docker"));
        assert!(prompt.contains("<JOB DESCRIPTION>\nWe ship containers to production.\n</JOB DESCRIPTION>"));
    }

    #[test]
    fn test_prompt_clips_job_context() {
        let job = "x".repeat(5000);
        let prompt = render_rewrite_prompt("sql", &job, 100);
        assert!(prompt.contains(&"x".repeat(100)));
        assert!(!prompt.contains(&"x".repeat(101)));
    }

    #[test]
    fn test_clean_generated_bullet() {
        assert_eq!(clean_generated_bullet("  - Built things.  "), "Built things.");
        assert_eq!(clean_generated_bullet("\n\n\"Shipped APIs.\"\nExtra line"), "Shipped APIs.");
        assert_eq!(clean_generated_bullet("• Led migrations"), "Led migrations");
        assert_eq!(clean_generated_bullet("   \n  "), "");
    }
}
