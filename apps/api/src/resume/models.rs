use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The candidate's base résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub summary: String,
    pub experience_details: Vec<String>,
    pub education: String,
    pub certifications: Vec<String>,
}

impl Resume {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial update applied on top of the base résumé. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub experience_years: Option<u32>,
    pub skills: Option<Vec<String>>,
    pub summary: Option<String>,
    pub experience_details: Option<Vec<String>>,
    pub education: Option<String>,
    pub certifications: Option<Vec<String>>,
}

impl ResumeUpdate {
    /// Returns `base` with every present field replaced.
    pub fn apply_to(self, base: &Resume) -> Resume {
        let mut updated = base.clone();
        if let Some(v) = self.name {
            updated.name = v;
        }
        if let Some(v) = self.email {
            updated.email = v;
        }
        if let Some(v) = self.phone {
            updated.phone = v;
        }
        if let Some(v) = self.location {
            updated.location = v;
        }
        if let Some(v) = self.experience_years {
            updated.experience_years = v;
        }
        if let Some(v) = self.skills {
            updated.skills = v;
        }
        if let Some(v) = self.summary {
            updated.summary = v;
        }
        if let Some(v) = self.experience_details {
            updated.experience_details = v;
        }
        if let Some(v) = self.education {
            updated.education = v;
        }
        if let Some(v) = self.certifications {
            updated.certifications = v;
        }
        updated
    }
}

/// What a customized résumé was tailored for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationInfo {
    pub job_title: String,
    pub company: String,
    /// Résumé skills (original casing) that the posting asks for.
    pub matching_skills: Vec<String>,
    /// matching / requirements, 0 when the posting lists none.
    pub match_score: f64,
}

/// A résumé rewritten for one posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizedResume {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience_years: u32,
    /// Matching skills first, at most ten.
    pub skills: Vec<String>,
    pub summary: String,
    pub experience_details: Vec<String>,
    pub education: String,
    pub certifications: Vec<String>,
    pub customized_for: CustomizationInfo,
}
