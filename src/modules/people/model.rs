//! Person domain models and DTOs.
//!
//! A person is one entry on the membership roster: an externally assigned
//! id (the roster number handed out on paper), a display name, the stage
//! they have reached on the membership track, and their running point score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::modules::scores::model::ScoreChange;

/// Membership stage of a person on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum PersonIdentity {
    Applicant,
    Activist,
    Member,
}

impl PersonIdentity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Activist => "activist",
            Self::Member => "member",
        }
    }
}

/// A person on the roster, as stored in the database.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Person {
    pub id: String,
    pub user_name: String,
    pub user_identity: PersonIdentity,
    pub add_timestamp: DateTime<Utc>,
    pub current_score: f64,
}

impl Person {
    /// Combine a person row with their adjustment history into the
    /// dashboard response shape.
    pub fn with_history(self, score_history: Vec<ScoreChange>) -> PersonWithHistory {
        PersonWithHistory {
            id: self.id,
            user_name: self.user_name,
            user_identity: self.user_identity,
            add_timestamp: self.add_timestamp,
            score: self.current_score,
            score_history,
        }
    }
}

/// A person together with their full adjustment history, newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct PersonWithHistory {
    pub id: String,
    pub user_name: String,
    pub user_identity: PersonIdentity,
    pub add_timestamp: DateTime<Utc>,
    pub score: f64,
    pub score_history: Vec<ScoreChange>,
}

/// DTO for adding a person to the roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePersonDto {
    #[validate(length(min = 1, max = 64, message = "id must be between 1 and 64 characters"))]
    pub id: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "user_name must be between 1 and 100 characters"
    ))]
    pub user_name: String,
    /// Defaults to `applicant` when omitted.
    pub user_identity: Option<PersonIdentity>,
    /// Defaults to 0 when omitted.
    pub initial_score: Option<f64>,
}

/// DTO for updating a person's name and/or membership stage.
///
/// Scores are deliberately absent: they only change through the
/// adjustment endpoint so that every mutation leaves an audit record.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePersonDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "user_name must be between 1 and 100 characters"
    ))]
    pub user_name: Option<String>,
    pub user_identity: Option<PersonIdentity>,
}

/// Query parameters for paginating a person's adjustment history.
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl HistoryQueryParams {
    /// Get the page number, defaulting to 1 if not specified.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the limit, defaulting to 10 and clamping between 1 and 100.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Calculate the offset based on page and limit.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata for history responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// One page of a person's adjustment history.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedHistoryResponse {
    pub data: Vec<ScoreChange>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_params_defaults() {
        let params = HistoryQueryParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_history_params_custom_values() {
        let params = HistoryQueryParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(params.page(), 3);
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_history_params_clamping() {
        let params = HistoryQueryParams {
            page: Some(-5),
            limit: Some(200),
        };
        assert_eq!(params.page(), 1); // Min page is 1
        assert_eq!(params.limit(), 100); // Max limit is 100
    }

    #[test]
    fn test_identity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PersonIdentity::Applicant).unwrap(),
            r#""applicant""#
        );
        assert_eq!(PersonIdentity::Member.as_str(), "member");
    }
}
