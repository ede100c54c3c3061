use crate::models::candidate::Candidate;

const NOT_INFORMED: &str = "Not informed";

/// Builds the anonymized resume snapshot stored on an application at
/// submission time. Only education, experience and skills survive; name,
/// national id, birth date, gender, address, e-mail and phone never enter
/// the text. The snapshot is written once and is not regenerated when the
/// candidate later edits their profile.
pub fn anonymize_resume(candidate: &Candidate) -> String {
    fn section(field: &Option<String>) -> &str {
        match field {
            Some(value) if !value.trim().is_empty() => value,
            _ => NOT_INFORMED,
        }
    }

    let resume = format!(
        "=== ANONYMIZED PROFESSIONAL PROFILE ===\n\
         \n\
         EDUCATION:\n\
         {}\n\
         \n\
         PROFESSIONAL EXPERIENCE:\n\
         {}\n\
         \n\
         TECHNICAL SKILLS:\n\
         {}\n\
         \n\
         ---\n\
         This resume was anonymized to support an unbiased screening process.\n\
         The candidate's identity is revealed only after technical approval.",
        section(&candidate.education),
        section(&candidate.experience),
        section(&candidate.skills),
    );

    resume.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn candidate() -> Candidate {
        Candidate {
            id: 7,
            full_name: "Maria Oliveira".to_string(),
            email: "maria.oliveira@example.com".to_string(),
            phone: Some("+5511999990000".to_string()),
            national_id: "12345678901".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12),
            gender: Some("female".to_string()),
            address: Some("Rua das Flores 100, Sao Paulo".to_string()),
            education: Some("BSc Computer Science".to_string()),
            experience: Some("5 years backend development".to_string()),
            skills: Some("Rust, SQL, distributed systems".to_string()),
            resume_url: None,
            registered_at: Utc::now(),
            active: true,
        }
    }

    #[test]
    fn keeps_only_professional_sections() {
        let resume = anonymize_resume(&candidate());

        assert!(resume.contains("BSc Computer Science"));
        assert!(resume.contains("5 years backend development"));
        assert!(resume.contains("Rust, SQL, distributed systems"));
    }

    #[test]
    fn never_leaks_identifying_fields() {
        let c = candidate();
        let resume = anonymize_resume(&c);

        assert!(!resume.contains(&c.full_name));
        assert!(!resume.contains(&c.email));
        assert!(!resume.contains(&c.national_id));
        assert!(!resume.contains(c.phone.as_deref().unwrap()));
        assert!(!resume.contains(c.address.as_deref().unwrap()));
        assert!(!resume.contains("1990"));
        assert!(!resume.contains("female"));
    }

    #[test]
    fn missing_sections_fall_back_to_placeholder() {
        let mut c = candidate();
        c.education = None;
        c.experience = Some("   ".to_string());
        c.skills = None;

        let resume = anonymize_resume(&c);
        assert_eq!(resume.matches(NOT_INFORMED).count(), 3);
    }

    #[test]
    fn output_is_trimmed() {
        let resume = anonymize_resume(&candidate());
        assert_eq!(resume, resume.trim());
        assert!(resume.starts_with("=== ANONYMIZED PROFESSIONAL PROFILE ==="));
    }
}
