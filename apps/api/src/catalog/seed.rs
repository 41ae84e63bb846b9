//! The eight built-in postings the catalog starts with.

use chrono::NaiveDate;

use crate::catalog::models::JobPosting;

struct SeedJob {
    id: &'static str,
    title: &'static str,
    company: &'static str,
    location: &'static str,
    description: &'static str,
    requirements: &'static [&'static str],
    experience_required: u32,
    salary_range: &'static str,
    posted_day: u32,
}

const SEED_JOBS: &[SeedJob] = &[
    SeedJob {
        id: "job_001",
        title: "Senior Python Developer",
        company: "Tech Giants Inc",
        location: "Remote",
        description: "We are looking for an experienced Python developer with 5+ years expertise in Django, FastAPI, and cloud technologies.",
        requirements: &["Python", "Django", "FastAPI", "Docker", "AWS", "PostgreSQL", "REST API"],
        experience_required: 5,
        salary_range: "$120k - $160k",
        posted_day: 1,
    },
    SeedJob {
        id: "job_002",
        title: "React Frontend Developer",
        company: "Innovation Labs",
        location: "San Francisco, CA",
        description: "Build amazing web applications with React, TypeScript, and modern frontend tools.",
        requirements: &["React", "TypeScript", "JavaScript", "CSS", "REST API", "Git"],
        experience_required: 3,
        salary_range: "$100k - $140k",
        posted_day: 3,
    },
    SeedJob {
        id: "job_003",
        title: "Machine Learning Engineer",
        company: "AI Solutions Corp",
        location: "Remote",
        description: "Develop and deploy machine learning models using TensorFlow, PyTorch, and cloud infrastructure.",
        requirements: &["Python", "Machine Learning", "TensorFlow", "PyTorch", "SQL", "AWS", "Docker"],
        experience_required: 4,
        salary_range: "$130k - $180k",
        posted_day: 5,
    },
    SeedJob {
        id: "job_004",
        title: "DevOps Engineer",
        company: "Cloud Systems Ltd",
        location: "New York, NY",
        description: "Manage cloud infrastructure, CI/CD pipelines, and deployment automation.",
        requirements: &["Docker", "Kubernetes", "AWS", "Jenkins", "Terraform", "Linux", "Python"],
        experience_required: 3,
        salary_range: "$110k - $150k",
        posted_day: 6,
    },
    SeedJob {
        id: "job_005",
        title: "Full Stack Developer",
        company: "StartUp Co",
        location: "Austin, TX",
        description: "Build end-to-end web applications using modern tech stack. Startup environment.",
        requirements: &["React", "Node.js", "MongoDB", "REST API", "JavaScript", "Docker"],
        experience_required: 2,
        salary_range: "$90k - $130k",
        posted_day: 7,
    },
    SeedJob {
        id: "job_006",
        title: "Data Engineer",
        company: "Data Corp",
        location: "Seattle, WA",
        description: "Build data pipelines and infrastructure for analytics at scale.",
        requirements: &["Python", "SQL", "Spark", "Kafka", "AWS", "Airflow", "ETL"],
        experience_required: 4,
        salary_range: "$120k - $160k",
        posted_day: 8,
    },
    SeedJob {
        id: "job_007",
        title: "Backend Engineer",
        company: "Microservices Inc",
        location: "Remote",
        description: "Design and implement scalable microservices architecture.",
        requirements: &["Java", "Spring", "Microservices", "Kubernetes", "REST API", "PostgreSQL"],
        experience_required: 5,
        salary_range: "$125k - $170k",
        posted_day: 9,
    },
    SeedJob {
        id: "job_008",
        title: "Cloud Architect",
        company: "Enterprise Tech",
        location: "Boston, MA",
        description: "Design cloud-native solutions and lead architecture decisions.",
        requirements: &["AWS", "Azure", "Kubernetes", "Terraform", "Python", "Microservices"],
        experience_required: 7,
        salary_range: "$150k - $200k",
        posted_day: 10,
    },
];

/// All seed postings were published in November 2025.
fn posted_on(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, day).unwrap_or_default()
}

/// Builds owned copies of the seed postings, in catalog order.
pub fn sample_jobs() -> Vec<JobPosting> {
    SEED_JOBS
        .iter()
        .map(|seed| JobPosting {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            company: seed.company.to_string(),
            location: seed.location.to_string(),
            description: seed.description.to_string(),
            requirements: seed.requirements.iter().map(|r| r.to_string()).collect(),
            experience_required: seed.experience_required,
            salary_range: seed.salary_range.to_string(),
            posted_date: posted_on(seed.posted_day),
            job_type: "Full-time".to_string(),
        })
        .collect()
}
