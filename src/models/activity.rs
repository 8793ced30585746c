//! Per-user side records: search history, favorites and feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// One entry of a user's append-only search log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchHistory {
    pub id: i64,
    pub user_id: i64,
    pub search_text: String,
    pub timestamp: DateTime<Utc>,
}

/// A user-item pairing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
}

/// Feedback one contract party leaves about the other.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub author_id: i64,
    /// The user the feedback is about.
    pub user_id: i64,
    pub text: Option<String>,
    pub grade: i64,
    pub contract_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FeedbackInput {
    #[validate(length(max = 2000))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub grade: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_grade_range() {
        for grade in 1..=5 {
            let input = FeedbackInput { text: None, grade };
            assert!(input.validate().is_ok(), "grade {} should be valid", grade);
        }
        for grade in [0, 6, -1] {
            let input = FeedbackInput { text: None, grade };
            assert!(input.validate().is_err(), "grade {} should be invalid", grade);
        }
    }
}
