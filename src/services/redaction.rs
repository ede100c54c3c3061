use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{
    application::{Application, ApplicationStatus},
    candidate::Candidate,
};

pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous Candidate";

/// Application view safe to show before the identity gate opens. Personal
/// candidate fields are absent from the type altogether, not nulled.
#[derive(Debug, Serialize)]
pub struct PublicApplicationView {
    pub id: i32,
    pub job_id: i32,
    pub job_title: Option<String>,
    pub candidate_id: i32,
    pub candidate_name: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub total_score: f64,
    pub identity_revealed: bool,
    pub anonymized_resume: String,
    pub feedback: Option<String>,
}

impl PublicApplicationView {
    /// The candidate's real name appears only once the identity has been
    /// revealed; until then the display name is a fixed placeholder.
    pub fn redact(
        application: &Application,
        job_title: Option<String>,
        candidate_name: Option<&str>,
    ) -> Self {
        let candidate_name = if application.identity_revealed {
            candidate_name
                .unwrap_or(ANONYMOUS_DISPLAY_NAME)
                .to_string()
        } else {
            ANONYMOUS_DISPLAY_NAME.to_string()
        };

        Self {
            id: application.id,
            job_id: application.job_id,
            job_title,
            candidate_id: application.candidate_id,
            candidate_name,
            submitted_at: application.submitted_at,
            status: application.status,
            total_score: application.total_score,
            identity_revealed: application.identity_revealed,
            anonymized_resume: application.anonymized_resume.clone(),
            feedback: application.feedback.clone(),
        }
    }
}

/// Complete view merging the application with the candidate's personal
/// profile. Only reachable once `identity_revealed` is true.
#[derive(Debug, Serialize)]
pub struct FullApplicationView {
    pub id: i32,
    pub job_id: i32,
    pub job_title: Option<String>,
    pub candidate_id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub total_score: f64,
    pub identity_revealed: bool,
    pub feedback: Option<String>,
}

impl FullApplicationView {
    pub fn merge(
        application: &Application,
        job_title: Option<String>,
        candidate: &Candidate,
    ) -> Self {
        Self {
            id: application.id,
            job_id: application.job_id,
            job_title,
            candidate_id: application.candidate_id,
            full_name: candidate.full_name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            national_id: candidate.national_id.clone(),
            birth_date: candidate.birth_date,
            gender: candidate.gender.clone(),
            address: candidate.address.clone(),
            education: candidate.education.clone(),
            experience: candidate.experience.clone(),
            skills: candidate.skills.clone(),
            submitted_at: application.submitted_at,
            status: application.status,
            total_score: application.total_score,
            identity_revealed: application.identity_revealed,
            feedback: application.feedback.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApplicationView {
    Public(PublicApplicationView),
    Full(FullApplicationView),
}

/// Pure disclosure decision: which of the two views a caller may see for
/// this application. Deterministic in its inputs and free of side effects.
pub fn visible_fields(
    application: &Application,
    job_title: Option<String>,
    candidate: &Candidate,
) -> ApplicationView {
    if application.identity_revealed {
        ApplicationView::Full(FullApplicationView::merge(application, job_title, candidate))
    } else {
        ApplicationView::Public(PublicApplicationView::redact(
            application,
            job_title,
            Some(&candidate.full_name),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate() -> Candidate {
        Candidate {
            id: 3,
            full_name: "Joao Pereira".to_string(),
            email: "joao.pereira@example.com".to_string(),
            phone: None,
            national_id: "98765432100".to_string(),
            birth_date: None,
            gender: Some("male".to_string()),
            address: Some("Av. Central 55".to_string()),
            education: Some("MSc".to_string()),
            experience: None,
            skills: None,
            resume_url: None,
            registered_at: Utc::now(),
            active: true,
        }
    }

    fn application(identity_revealed: bool) -> Application {
        Application {
            id: 11,
            job_id: 4,
            candidate_id: 3,
            submitted_at: Utc::now(),
            status: ApplicationStatus::Submitted,
            total_score: 0.0,
            identity_revealed,
            anonymized_resume: "EDUCATION:\nMSc".to_string(),
            feedback: None,
        }
    }

    #[test]
    fn unrevealed_application_shows_the_placeholder_name() {
        let view = PublicApplicationView::redact(
            &application(false),
            Some("Backend Engineer".to_string()),
            Some("Joao Pereira"),
        );

        assert_eq!(view.candidate_name, ANONYMOUS_DISPLAY_NAME);
        assert!(!view.identity_revealed);
    }

    #[test]
    fn unrevealed_view_omits_personal_fields_entirely() {
        let view = PublicApplicationView::redact(&application(false), None, Some("Joao Pereira"));
        let value = serde_json::to_value(view).unwrap();

        for field in ["full_name", "national_id", "birth_date", "gender", "address", "email"] {
            assert!(value.get(field).is_none(), "field {field} must be absent");
        }
    }

    #[test]
    fn revealed_application_shows_the_real_name() {
        let view = PublicApplicationView::redact(&application(true), None, Some("Joao Pereira"));
        assert_eq!(view.candidate_name, "Joao Pereira");
    }

    #[test]
    fn visible_fields_dispatches_on_the_disclosure_flag() {
        let c = candidate();

        match visible_fields(&application(false), None, &c) {
            ApplicationView::Public(view) => {
                assert_eq!(view.candidate_name, ANONYMOUS_DISPLAY_NAME)
            }
            ApplicationView::Full(_) => panic!("unrevealed application must stay redacted"),
        }

        match visible_fields(&application(true), Some("Backend Engineer".to_string()), &c) {
            ApplicationView::Full(view) => {
                assert_eq!(view.full_name, "Joao Pereira");
                assert_eq!(view.national_id, "98765432100");
                assert_eq!(view.job_title.as_deref(), Some("Backend Engineer"));
            }
            ApplicationView::Public(_) => panic!("revealed application must merge the profile"),
        }
    }
}
