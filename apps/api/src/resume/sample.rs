use crate::resume::models::Resume;

/// The built-in candidate every workflow run customizes.
pub fn sample_resume() -> Resume {
    Resume {
        name: "Alex Chen".to_string(),
        email: "alex.chen@email.com".to_string(),
        phone: "+1-555-0123".to_string(),
        location: "San Francisco, CA".to_string(),
        experience_years: 6,
        skills: [
            "Python",
            "Java",
            "Docker",
            "Kubernetes",
            "AWS",
            "Machine Learning",
            "PostgreSQL",
            "REST API",
            "Git",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        summary: "Experienced software engineer with 6+ years building scalable distributed systems and machine learning applications".to_string(),
        experience_details: vec![
            "Led team of 8 engineers developing microservices platform serving 10M+ users".to_string(),
            "Architected and deployed Kubernetes infrastructure reducing deployment time by 70%".to_string(),
            "Implemented ML pipeline processing 1B+ events daily with 99.9% uptime".to_string(),
            "Reduced API latency by 60% through query optimization and caching strategies".to_string(),
        ],
        education: "BS Computer Science, Stanford University".to_string(),
        certifications: vec![
            "AWS Certified Solutions Architect".to_string(),
            "Kubernetes Administrator".to_string(),
        ],
    }
}
