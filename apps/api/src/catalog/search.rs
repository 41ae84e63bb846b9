//! Job Catalog — in-memory posting store with keyword/location search.
//!
//! Search semantics:
//! - keywords are lower-cased and whitespace-split; a posting matches when ANY
//!   keyword is a substring of its title + description + requirements
//! - a non-empty location must be a case-insensitive substring of the posting location
//! - results keep catalog order and are truncated to `limit`

use tracing::debug;

use crate::catalog::models::JobPosting;
use crate::catalog::seed::sample_jobs;
use crate::errors::AppError;
use crate::text::normalize::lowercase_set;

#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    jobs: Vec<JobPosting>,
}

impl JobCatalog {
    pub fn new(jobs: Vec<JobPosting>) -> Self {
        Self { jobs }
    }

    /// Catalog pre-loaded with the eight seed postings.
    pub fn with_sample_jobs() -> Self {
        Self::new(sample_jobs())
    }

    pub fn search_jobs(&self, keywords: &str, location: &str, limit: usize) -> Vec<JobPosting> {
        let keyword_list: Vec<String> = keywords
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let location = location.trim().to_lowercase();

        let matched: Vec<JobPosting> = self
            .jobs
            .iter()
            .filter(|job| {
                if keyword_list.is_empty() {
                    return true;
                }
                let text = job.searchable_text();
                keyword_list.iter().any(|kw| text.contains(kw.as_str()))
            })
            .filter(|job| location.is_empty() || job.location.to_lowercase().contains(&location))
            .take(limit)
            .cloned()
            .collect();

        debug!(
            keywords,
            location = %location,
            limit,
            found = matched.len(),
            "catalog search"
        );
        matched
    }

    pub fn get_job_by_id(&self, job_id: &str) -> Option<JobPosting> {
        self.jobs.iter().find(|job| job.id == job_id).cloned()
    }

    pub fn all_jobs(&self) -> Vec<JobPosting> {
        self.jobs.clone()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Appends a validated posting. Ids must stay unique.
    pub fn add_job(&mut self, job: JobPosting) -> Result<(), AppError> {
        job.validate()?;
        if self.jobs.iter().any(|existing| existing.id == job.id) {
            return Err(AppError::Validation(format!(
                "A job with id '{}' already exists",
                job.id
            )));
        }
        self.jobs.push(job);
        Ok(())
    }
}

/// Keeps postings whose required experience lies in `min_years..=max_years`.
pub fn filter_by_experience(jobs: Vec<JobPosting>, min_years: u32, max_years: u32) -> Vec<JobPosting> {
    jobs.into_iter()
        .filter(|job| (min_years..=max_years).contains(&job.experience_required))
        .collect()
}

/// Keeps postings that require at least one of `skills` (case-insensitive).
pub fn filter_by_skills<S: AsRef<str>>(jobs: Vec<JobPosting>, skills: &[S]) -> Vec<JobPosting> {
    let wanted = lowercase_set(skills);
    jobs.into_iter()
        .filter(|job| {
            job.requirements
                .iter()
                .any(|req| wanted.contains(&req.to_lowercase()))
        })
        .collect()
}
