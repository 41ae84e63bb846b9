use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A single job posting held in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub experience_required: u32,
    #[serde(default)]
    pub salary_range: String,
    pub posted_date: NaiveDate,
    #[serde(default = "default_job_type")]
    pub job_type: String,
}

fn default_job_type() -> String {
    "Full-time".to_string()
}

impl JobPosting {
    /// Rejects postings the matcher and customizer cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id.trim().is_empty() {
            return Err(AppError::Validation("Job id cannot be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("Company cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Lower-cased text searched by keyword queries: title, description and requirements.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.requirements.join(" ")
        )
        .to_lowercase()
    }
}
