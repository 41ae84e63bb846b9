//! Skill vocabulary and skill-overlap arithmetic.

use std::collections::BTreeSet;

use crate::catalog::models::JobPosting;
use crate::resume::models::Resume;
use crate::text::normalize::lowercase_set;

/// Known technology skills, matched as lower-case substrings.
pub const TECH_SKILLS: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "swift",
    "react", "angular", "vue", "nodejs", "express", "django", "flask", "fastapi", "spring",
    "docker", "kubernetes", "jenkins", "gitlab", "github", "terraform", "ansible",
    "aws", "azure", "gcp", "cloud", "serverless", "lambda",
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra",
    "rest", "graphql", "grpc", "api", "microservices", "kafka", "rabbitmq",
    "machine learning", "deep learning", "nlp", "computer vision", "tensorflow", "pytorch",
    "scikit-learn",
    "git", "agile", "scrum", "ci/cd", "devops", "linux", "bash", "shell",
];

/// Skill weight in [`calculate_match_score`]; experience takes the rest.
const SKILL_WEIGHT: f64 = 0.6;
const EXPERIENCE_WEIGHT: f64 = 0.4;

/// Every known skill that occurs anywhere in `text`. Sorted and unique.
///
/// Matching is plain substring search, so short names such as "go" also hit
/// inside longer words.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TECH_SKILLS
        .iter()
        .filter(|skill| lowered.contains(*skill))
        .map(|skill| skill.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fraction of required job skills covered by the résumé (case-insensitive).
///
/// A job with no listed skills is fully covered; an empty résumé covers nothing.
pub fn calculate_skill_match<S: AsRef<str>, T: AsRef<str>>(resume_skills: &[S], job_skills: &[T]) -> f64 {
    if job_skills.is_empty() {
        return 1.0;
    }
    if resume_skills.is_empty() {
        return 0.0;
    }

    let resume_set = lowercase_set(resume_skills);
    let job_set = lowercase_set(job_skills);
    let matching = resume_set.intersection(&job_set).count();

    matching as f64 / job_set.len() as f64
}

/// Weighted blend of skill coverage (0.6) and experience coverage (0.4).
pub fn calculate_match_score(resume: &Resume, job: &JobPosting) -> f64 {
    let skill_score = calculate_skill_match(&resume.skills, &job.requirements);

    let experience_score = if job.experience_required > 0 {
        (resume.experience_years as f64 / job.experience_required as f64).min(1.0)
    } else {
        1.0
    };

    skill_score * SKILL_WEIGHT + experience_score * EXPERIENCE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::sample_jobs;
    use crate::resume::sample::sample_resume;

    #[test]
    fn test_extract_skills_finds_known_names() {
        let skills = extract_skills("Looking for Python and Kubernetes experts with AWS");
        assert!(skills.contains(&"python".to_string()));
        assert!(skills.contains(&"kubernetes".to_string()));
        assert!(skills.contains(&"aws".to_string()));
    }

    #[test]
    fn test_extract_skills_is_sorted_and_unique() {
        let skills = extract_skills("docker docker Docker");
        assert_eq!(skills, vec!["docker".to_string()]);
        let mut sorted = extract_skills("Rust, Python, Docker, SQL");
        let original = sorted.clone();
        sorted.sort();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_extract_skills_multi_word() {
        let skills = extract_skills("Deep Learning and Machine Learning research");
        assert!(skills.contains(&"deep learning".to_string()));
        assert!(skills.contains(&"machine learning".to_string()));
    }

    #[test]
    fn test_skill_match_full_and_partial() {
        assert_eq!(calculate_skill_match(&["Python", "Docker"], &["python", "docker"]), 1.0);
        assert_eq!(calculate_skill_match(&["Python"], &["python", "docker"]), 0.5);
    }

    #[test]
    fn test_skill_match_edge_cases() {
        let empty: [&str; 0] = [];
        assert_eq!(calculate_skill_match(&["Python"], &empty), 1.0);
        assert_eq!(calculate_skill_match(&empty, &["Python"]), 0.0);
    }

    #[test]
    fn test_match_score_blends_skills_and_experience() {
        let resume = sample_resume();
        let jobs = sample_jobs();
        // job_008 Cloud Architect: AWS, Kubernetes, Python match (3/6); 6 of 7 years.
        let cloud = jobs.iter().find(|j| j.id == "job_008").unwrap();
        let score = calculate_match_score(&resume, cloud);
        let expected = 0.5 * 0.6 + (6.0 / 7.0) * 0.4;
        assert!((score - expected).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_match_score_caps_experience() {
        let resume = sample_resume();
        let mut job = sample_jobs().remove(0);
        job.requirements = resume.skills.clone();
        job.experience_required = 1;
        assert!((calculate_match_score(&resume, &job) - 1.0).abs() < 1e-9);
    }
}
