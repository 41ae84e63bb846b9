//! Plain-text renderings of résumés and postings, plus score normalisation.

use crate::catalog::models::JobPosting;
use crate::resume::models::Resume;

/// Four-line résumé digest: name, years, top five skills, education.
pub fn resume_summary(resume: &Resume) -> String {
    let top_skills: Vec<&str> = resume.skills.iter().take(5).map(String::as_str).collect();
    format!(
        "Name: {}\nExperience: {} years\nSkills: {}\nEducation: {}",
        or_na(&resume.name),
        resume.experience_years,
        top_skills.join(", "),
        or_na(&resume.education),
    )
}

/// Four-line posting digest: title, company, location, requirements.
pub fn format_job_description(job: &JobPosting) -> String {
    format!(
        "Title: {}\nCompany: {}\nLocation: {}\nRequirements: {}",
        or_na(&job.title),
        or_na(&job.company),
        or_na(&job.location),
        job.requirements.join(", "),
    )
}

/// Maps `score` from `[min, max]` onto `[0, 1]`, clamping out-of-range input.
/// A degenerate range yields 0.
pub fn normalize_score(score: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    ((score - min) / (max - min)).clamp(0.0, 1.0)
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::sample_jobs;
    use crate::resume::sample::sample_resume;

    #[test]
    fn test_resume_summary_lists_top_five_skills() {
        let summary = resume_summary(&sample_resume());
        assert!(summary.starts_with("Name: Alex Chen"));
        assert!(summary.contains("Experience: 6 years"));
        assert!(summary.contains("Skills: Python, Java, Docker, Kubernetes, AWS"));
        assert!(!summary.contains("PostgreSQL"));
    }

    #[test]
    fn test_format_job_description() {
        let job = sample_jobs().remove(3);
        let text = format_job_description(&job);
        assert!(text.contains("Title: DevOps Engineer"));
        assert!(text.contains("Company: Cloud Systems Ltd"));
        assert!(text.contains("Requirements: Docker, Kubernetes, AWS"));
    }

    #[test]
    fn test_blank_fields_render_as_na() {
        let mut resume = sample_resume();
        resume.education = String::new();
        assert!(resume_summary(&resume).contains("Education: N/A"));
    }

    #[test]
    fn test_normalize_score() {
        assert_eq!(normalize_score(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize_score(15.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize_score(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize_score(3.0, 2.0, 2.0), 0.0);
    }
}
