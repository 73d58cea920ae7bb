use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::datatype::choice::ReviewStatus;

use super::{impl_entity, state_copy, state_ref, EntityData, EntityState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewState {
    pub(in crate::domain) application_id: Uuid,
    pub(in crate::domain) reviewer_id: Option<Uuid>,
    pub(in crate::domain) status: ReviewStatus,
    pub(in crate::domain) reviewer_comments: String,
    pub(in crate::domain) decision_sent_date: Option<NaiveDate>,
}

/// Organizer decision on an application.
#[derive(Debug, Clone)]
pub struct Review {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: ReviewState,
}

impl EntityState for Review {
    type State = ReviewState;
}

impl_entity!(Review);

impl Review {
    state_copy!(application_id, Uuid);
    state_copy!(reviewer_id, Option<Uuid>);
    state_copy!(status, ReviewStatus);
    state_ref!(reviewer_comments, String);
    state_copy!(decision_sent_date, Option<NaiveDate>);

    pub fn new(
        application_id: Uuid,
        reviewer_id: Uuid,
        status: ReviewStatus,
        reviewer_comments: String,
    ) -> Self {
        Self::restore(
            EntityData::new(),
            ReviewState {
                application_id,
                reviewer_id: Some(reviewer_id),
                status,
                reviewer_comments,
                decision_sent_date: None,
            },
        )
    }

    /// Record a new decision, a changed status has to be sent again.
    pub fn revise(&mut self, reviewer_id: Uuid, status: ReviewStatus, reviewer_comments: String) {
        if self.state.status != status {
            self.state.decision_sent_date = None;
        }
        self.state.reviewer_id = Some(reviewer_id);
        self.state.status = status;
        self.state.reviewer_comments = reviewer_comments;
        self.data.touch();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::entity::Entity;

    fn sent_review(status: ReviewStatus) -> Review {
        let sent = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let mut review = Review::new(Uuid::new_v4(), Uuid::new_v4(), status, "".into());
        review.state.decision_sent_date = Some(sent);
        review
    }

    #[test]
    fn revising_status_resets_sent_decision() {
        let reviewer = Uuid::new_v4();
        let mut review = sent_review(ReviewStatus::Waitlisted);

        review.revise(reviewer, ReviewStatus::Waitlisted, "still waiting".into());
        assert!(review.decision_sent_date().is_some());

        review.revise(reviewer, ReviewStatus::Accepted, "spot opened".into());
        assert_eq!(review.decision_sent_date(), None);
        assert_eq!(review.reviewer_id(), Some(reviewer));
        assert_eq!(review.version(), 3);
    }

    #[test]
    fn revising_comments_keeps_sent_decision() {
        let mut review = sent_review(ReviewStatus::Rejected);
        review.revise(Uuid::new_v4(), ReviewStatus::Rejected, "duplicate".into());

        assert!(review.decision_sent_date().is_some());
        assert_eq!(review.reviewer_comments(), "duplicate");
    }
}
