//! Résumé Customizer — tailors the base résumé to a single posting.
//!
//! Algorithm:
//! 1. matching skills = résumé skills whose lower-case form the posting requires
//!    (résumé casing and order preserved)
//! 2. skills = matching skills first, then the rest, capped at ten
//! 3. summary = SUMMARY_TEMPLATE filled with years and the first five matching skills
//! 4. experience bullets ranked by how many requirements they mention, top four kept
//! 5. match_score = |matching| / |requirements|

use std::cmp::Reverse;

use tracing::debug;

use crate::catalog::models::JobPosting;
use crate::errors::AppError;
use crate::resume::models::{CustomizationInfo, CustomizedResume, Resume, ResumeUpdate};
use crate::resume::sample::sample_resume;
use crate::resume::templates::{COVER_LETTER_TEMPLATE, SUMMARY_TEMPLATE};
use crate::text::normalize::lowercase_set;

const MAX_SKILLS: usize = 10;
const SUMMARY_SKILLS: usize = 5;
const COVER_LETTER_SKILLS: usize = 3;
const MAX_EXPERIENCE_BULLETS: usize = 4;

#[derive(Debug, Clone)]
pub struct ResumeCustomizer {
    base: Resume,
}

impl Default for ResumeCustomizer {
    fn default() -> Self {
        Self::new(sample_resume())
    }
}

impl ResumeCustomizer {
    pub fn new(base: Resume) -> Self {
        Self { base }
    }

    pub fn sample_resume(&self) -> &Resume {
        &self.base
    }

    /// Applies a partial update to the base résumé. The result must still validate.
    pub fn update_resume(&mut self, update: ResumeUpdate) -> Result<&Resume, AppError> {
        let updated = update.apply_to(&self.base);
        updated.validate()?;
        self.base = updated;
        Ok(&self.base)
    }

    pub fn customize_for_job(&self, job: &JobPosting) -> CustomizedResume {
        let matching_skills = matching_skills(&self.base.skills, &job.requirements);

        let mut prioritized = matching_skills.clone();
        prioritized.extend(
            self.base
                .skills
                .iter()
                .filter(|skill| !matching_skills.contains(skill))
                .cloned(),
        );
        prioritized.truncate(MAX_SKILLS);

        let summary = self.custom_summary(&matching_skills);
        let experience_details =
            select_relevant_experience(&self.base.experience_details, &job.requirements);

        let match_score = if job.requirements.is_empty() {
            0.0
        } else {
            matching_skills.len() as f64 / job.requirements.len() as f64
        };

        debug!(
            job_id = %job.id,
            matching = matching_skills.len(),
            match_score,
            "customized resume"
        );

        CustomizedResume {
            name: self.base.name.clone(),
            email: self.base.email.clone(),
            phone: self.base.phone.clone(),
            location: self.base.location.clone(),
            experience_years: self.base.experience_years,
            skills: prioritized,
            summary,
            experience_details,
            education: self.base.education.clone(),
            certifications: self.base.certifications.clone(),
            customized_for: CustomizationInfo {
                job_title: job.title.clone(),
                company: job.company.clone(),
                matching_skills,
                match_score,
            },
        }
    }

    pub fn batch_customize(&self, jobs: &[JobPosting]) -> Vec<CustomizedResume> {
        jobs.iter().map(|job| self.customize_for_job(job)).collect()
    }

    /// Fills the cover letter template for `job` from an already customized résumé.
    pub fn generate_cover_letter(&self, job: &JobPosting, resume: &CustomizedResume) -> String {
        let name = non_empty_or(&resume.name, "Applicant");
        let job_title = non_empty_or(&job.title, "Position");
        let company = non_empty_or(&job.company, "Company");
        let skills = resume
            .customized_for
            .matching_skills
            .iter()
            .take(COVER_LETTER_SKILLS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        COVER_LETTER_TEMPLATE
            .replace("{job_title}", job_title)
            .replace("{company}", company)
            .replace("{years}", &resume.experience_years.to_string())
            .replace("{skills}", &skills)
            .replace("{summary}", &resume.summary)
            .replace("{name}", name)
    }

    /// Falls back to the résumé's leading skills when nothing matches, so the
    /// sentence never ends in an empty list.
    fn custom_summary(&self, matching_skills: &[String]) -> String {
        let source = if matching_skills.is_empty() {
            &self.base.skills[..]
        } else {
            matching_skills
        };
        let skills = source
            .iter()
            .take(SUMMARY_SKILLS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        SUMMARY_TEMPLATE
            .replace("{years}", &self.base.experience_years.to_string())
            .replace("{skills}", &skills)
    }
}

/// Résumé skills required by the posting, in résumé order and casing.
pub fn matching_skills(resume_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let job_set = lowercase_set(job_skills);
    resume_skills
        .iter()
        .filter(|skill| job_set.contains(&skill.to_lowercase()))
        .cloned()
        .collect()
}

/// Ranks bullets by the number of distinct requirements they mention (substring,
/// case-insensitive). Ties keep résumé order.
pub fn select_relevant_experience(bullets: &[String], job_skills: &[String]) -> Vec<String> {
    let job_set = lowercase_set(job_skills);

    let mut scored: Vec<(usize, &String)> = bullets
        .iter()
        .map(|bullet| {
            let lower = bullet.to_lowercase();
            let hits = job_set.iter().filter(|skill| lower.contains(skill.as_str())).count();
            (hits, bullet)
        })
        .collect();
    scored.sort_by_key(|(hits, _)| Reverse(*hits));

    scored
        .into_iter()
        .take(MAX_EXPERIENCE_BULLETS)
        .map(|(_, bullet)| bullet.clone())
        .collect()
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_job(title: &str, company: &str, requirements: &[&str]) -> JobPosting {
        JobPosting {
            id: "job_test".to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            requirements: requirements.iter().map(|s| s.to_string()).collect(),
            experience_required: 3,
            salary_range: String::new(),
            posted_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            job_type: "Full-time".to_string(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matching_skills_keep_resume_casing_and_order() {
        let matched = matching_skills(
            &strings(&["Python", "Docker", "AWS"]),
            &strings(&["docker", "PYTHON", "Kubernetes"]),
        );
        assert_eq!(matched, vec!["Python", "Docker"]);
    }

    #[test]
    fn test_customize_prioritizes_matching_skills() {
        let customizer = ResumeCustomizer::default();
        let job = make_job("Python Developer", "Tech Corp", &["Git", "Docker"]);
        let customized = customizer.customize_for_job(&job);
        assert_eq!(&customized.skills[..2], &["Docker".to_string(), "Git".to_string()]);
        assert_eq!(customized.skills.len(), 9);
    }

    #[test]
    fn test_skills_capped_at_ten() {
        let mut base = sample_resume();
        base.skills.extend(strings(&["Rust", "Go", "C++"]));
        let customizer = ResumeCustomizer::new(base);
        let customized = customizer.customize_for_job(&make_job("Dev", "Co", &["Rust"]));
        assert_eq!(customized.skills.len(), 10);
        assert_eq!(customized.skills[0], "Rust");
    }

    #[test]
    fn test_summary_mentions_matching_skills_and_years() {
        let customizer = ResumeCustomizer::default();
        let customized = customizer.customize_for_job(&make_job("Developer", "Tech Corp", &["Python"]));
        assert!(customized.summary.contains("6+ years"));
        assert!(customized.summary.contains("specializing in Python."));
    }

    #[test]
    fn test_summary_falls_back_to_resume_skills_without_matches() {
        let customizer = ResumeCustomizer::default();
        let customized = customizer.customize_for_job(&make_job("Designer", "Art Co", &["Figma"]));
        assert!(customized
            .summary
            .contains("specializing in Python, Java, Docker, Kubernetes, AWS."));
        assert!(customized.customized_for.matching_skills.is_empty());
        assert_eq!(customized.customized_for.match_score, 0.0);
    }

    #[test]
    fn test_experience_bullets_ranked_by_mentions() {
        let customizer = ResumeCustomizer::default();
        let customized =
            customizer.customize_for_job(&make_job("Developer", "Tech", &["microservices", "kubernetes"]));
        assert_eq!(customized.experience_details.len(), 4);
        assert!(customized.experience_details[0].contains("microservices"));
        assert!(customized.experience_details[1].contains("Kubernetes"));
    }

    #[test]
    fn test_experience_ties_keep_resume_order() {
        let bullets = strings(&["first", "second", "third"]);
        let selected = select_relevant_experience(&bullets, &strings(&["none"]));
        assert_eq!(selected, bullets);
    }

    #[test]
    fn test_customization_metadata() {
        let customizer = ResumeCustomizer::default();
        let job = make_job("Developer", "Tech", &["Python", "Docker", "Kubernetes", "Rust"]);
        let customized = customizer.customize_for_job(&job);
        assert_eq!(customized.customized_for.job_title, "Developer");
        assert_eq!(customized.customized_for.company, "Tech");
        assert!((customized.customized_for.match_score - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_requirements_scores_zero() {
        let customizer = ResumeCustomizer::default();
        let customized = customizer.customize_for_job(&make_job("Developer", "Tech", &[]));
        assert_eq!(customized.customized_for.match_score, 0.0);
    }

    #[test]
    fn test_cover_letter_contents() {
        let customizer = ResumeCustomizer::default();
        let job = make_job("Senior Developer", "Tech Inc", &["Python", "AWS", "Docker", "Git"]);
        let customized = customizer.customize_for_job(&job);
        let letter = customizer.generate_cover_letter(&job, &customized);
        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("Senior Developer position at Tech Inc"));
        assert!(letter.contains("Python, Docker, AWS,"));
        assert!(!letter.contains("Git,"));
        assert!(letter.contains("contribute to Tech Inc's success"));
        assert!(letter.ends_with("Alex Chen"));
    }

    #[test]
    fn test_cover_letter_placeholders_for_blank_fields() {
        let customizer = ResumeCustomizer::default();
        let job = make_job("", "", &["Python"]);
        let mut customized = customizer.customize_for_job(&job);
        customized.name.clear();
        let letter = customizer.generate_cover_letter(&job, &customized);
        assert!(letter.contains("the Position position at Company"));
        assert!(letter.ends_with("Applicant"));
    }

    #[test]
    fn test_batch_customize() {
        let customizer = ResumeCustomizer::default();
        let jobs = vec![
            make_job("Dev 1", "Corp 1", &["Python"]),
            make_job("Dev 2", "Corp 2", &["Java"]),
        ];
        let customized = customizer.batch_customize(&jobs);
        assert_eq!(customized.len(), 2);
        assert_eq!(customized[1].skills[0], "Java");
    }

    #[test]
    fn test_update_resume() {
        let mut customizer = ResumeCustomizer::default();
        let update = ResumeUpdate {
            name: Some("New Name".to_string()),
            ..ResumeUpdate::default()
        };
        assert_eq!(customizer.update_resume(update).unwrap().name, "New Name");
        assert_eq!(customizer.sample_resume().name, "New Name");
    }

    #[test]
    fn test_update_resume_rejects_blank_name() {
        let mut customizer = ResumeCustomizer::default();
        let update = ResumeUpdate {
            name: Some(String::new()),
            ..ResumeUpdate::default()
        };
        assert!(customizer.update_resume(update).is_err());
        assert_eq!(customizer.sample_resume().name, "Alex Chen");
    }
}
