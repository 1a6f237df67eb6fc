//! Score adjustment models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Direction of an adjustment as declared by the caller.
///
/// The applied delta is always `adjustment_amount` with its actual sign;
/// the type is recorded alongside it in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum AdjustmentType {
    Add,
    Deduct,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Deduct => "deduct",
        }
    }
}

/// One audit record in a person's adjustment history.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ScoreChange {
    pub id: i64,
    pub person_id: String,
    pub reason: String,
    pub old_score: f64,
    pub new_score: f64,
    pub adjustment_amount: f64,
    pub adjustment_type: AdjustmentType,
    pub timestamp: DateTime<Utc>,
    pub updated_by: String,
}

/// DTO for a batched score adjustment.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustScoresDto {
    /// Roster ids to adjust, in order.
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<String>,
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub reason: String,
    /// Signed delta; positive adds, negative deducts.
    pub adjustment_amount: f64,
    pub adjustment_type: AdjustmentType,
    #[validate(length(min = 1, message = "updated_by must not be empty"))]
    pub updated_by: String,
}

/// Response for a committed adjustment batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdjustScoresResponse {
    pub updated_count: usize,
}
