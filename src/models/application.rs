use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i32,
    pub job_id: i32,
    pub candidate_id: i32,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub total_score: f64,
    pub identity_revealed: bool,
    pub anonymized_resume: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderEvaluation,
    TechnicallyApproved,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderEvaluation => "under_evaluation",
            ApplicationStatus::TechnicallyApproved => "technically_approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    /// Single gate for transition validity. Every transition is currently
    /// allowed, so recruiters can correct a status after the fact; tighten
    /// the match here if a stricter flow is ever wanted.
    pub fn can_transition_to(&self, _next: ApplicationStatus) -> bool {
        true
    }

    /// Whether moving into this status opens the identity gate.
    pub fn reveals_identity(&self) -> bool {
        matches!(self, ApplicationStatus::TechnicallyApproved)
    }
}

impl FromStr for ApplicationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "under_evaluation" => Ok(ApplicationStatus::UnderEvaluation),
            "technically_approved" => Ok(ApplicationStatus::TechnicallyApproved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            _ => Err(()),
        }
    }
}

/// Identity disclosure is monotonic: once a recruiter has seen a candidate's
/// identity there is no way to unsee it, so no status change may flip the
/// flag back to false.
pub fn next_identity_revealed(current: bool, new_status: ApplicationStatus) -> bool {
    current || new_status.reveals_identity()
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitApplicationRequest {
    #[validate(range(min = 1))]
    pub job_id: i32,
    #[validate(range(min = 1))]
    pub candidate_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateApplicationStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}

/// An application row joined with its job title and candidate name, as the
/// list endpoints fetch it in one query.
#[derive(Debug, FromRow)]
pub struct ApplicationListRow {
    #[sqlx(flatten)]
    pub application: Application,
    pub job_title: String,
    pub candidate_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_all_five_values() {
        assert_eq!("submitted".parse(), Ok(ApplicationStatus::Submitted));
        assert_eq!(
            "under_evaluation".parse(),
            Ok(ApplicationStatus::UnderEvaluation)
        );
        assert_eq!(
            "technically_approved".parse(),
            Ok(ApplicationStatus::TechnicallyApproved)
        );
        assert_eq!("rejected".parse(), Ok(ApplicationStatus::Rejected));
        assert_eq!("hired".parse(), Ok(ApplicationStatus::Hired));
    }

    #[test]
    fn status_rejects_unknown_and_wrong_case() {
        assert!("Hired".parse::<ApplicationStatus>().is_err());
        assert!("open".parse::<ApplicationStatus>().is_err());
        assert!("".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn every_transition_is_currently_allowed() {
        let all = [
            ApplicationStatus::Submitted,
            ApplicationStatus::UnderEvaluation,
            ApplicationStatus::TechnicallyApproved,
            ApplicationStatus::Rejected,
            ApplicationStatus::Hired,
        ];
        for from in all {
            for to in all {
                assert!(from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn only_technical_approval_opens_the_identity_gate() {
        assert!(ApplicationStatus::TechnicallyApproved.reveals_identity());
        assert!(!ApplicationStatus::Submitted.reveals_identity());
        assert!(!ApplicationStatus::UnderEvaluation.reveals_identity());
        assert!(!ApplicationStatus::Rejected.reveals_identity());
        assert!(!ApplicationStatus::Hired.reveals_identity());
    }

    #[test]
    fn identity_reveal_is_monotonic() {
        let mut revealed = false;
        revealed = next_identity_revealed(revealed, ApplicationStatus::UnderEvaluation);
        assert!(!revealed);

        revealed = next_identity_revealed(revealed, ApplicationStatus::TechnicallyApproved);
        assert!(revealed);

        // A later rejection does not close the gate again.
        revealed = next_identity_revealed(revealed, ApplicationStatus::Rejected);
        assert!(revealed);
    }
}
