/// Professional summary written into every customized résumé.
/// Placeholders: {years}, {skills}
pub const SUMMARY_TEMPLATE: &str = "Experienced software engineer with {years}+ years of expertise \
specializing in {skills}. \
Proven track record in building scalable systems and delivering high-impact solutions. \
Passionate about leveraging technology to solve complex problems.";

/// Cover letter body.
/// Placeholders: {job_title}, {company}, {years}, {skills}, {summary}, {name}
pub const COVER_LETTER_TEMPLATE: &str = r#"Dear Hiring Manager,

I am writing to express my strong interest in the {job_title} position at {company}.
With {years} years of professional experience and expertise in
{skills}, I am confident I would be a valuable addition to your team.

{summary}

I am particularly excited about this opportunity because it aligns perfectly with my
technical skills and career goals. I look forward to the possibility of discussing how
my experience and skills can contribute to {company}'s success.

Thank you for considering my application.

Best regards,
{name}"#;
