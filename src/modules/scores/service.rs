use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::metrics::track_adjustment_rejected;
use crate::modules::scores::model::{AdjustScoresDto, AdjustScoresResponse, AdjustmentType};
use crate::utils::errors::AppError;

/// Request checks beyond what the derive-level validator covers.
///
/// Mirrors the adjustment rules: reason and actor must survive trimming,
/// and the delta must be a usable number.
fn check_adjustment(dto: &AdjustScoresDto) -> Result<(), AppError> {
    if dto.reason.trim().is_empty() {
        track_adjustment_rejected("blank_reason");
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "reason must not be blank"
        )));
    }

    if dto.updated_by.trim().is_empty() {
        track_adjustment_rejected("blank_updated_by");
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "updated_by must not be blank"
        )));
    }

    if !dto.adjustment_amount.is_finite() {
        track_adjustment_rejected("non_finite_amount");
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "adjustment_amount must be a finite number"
        )));
    }

    Ok(())
}

pub struct ScoreService;

impl ScoreService {
    /// Apply one signed adjustment to every person in the batch, atomically.
    ///
    /// Each row is locked with `SELECT ... FOR UPDATE` before its score is
    /// recomputed, and every update appends an audit record stamped with a
    /// single server timestamp for the whole batch. The first missing id
    /// rolls the entire batch back.
    #[instrument(skip(db, dto), fields(batch_size = dto.ids.len()))]
    pub async fn adjust_scores(
        db: &PgPool,
        dto: AdjustScoresDto,
    ) -> Result<AdjustScoresResponse, AppError> {
        check_adjustment(&dto)?;

        let mismatched_sign = match dto.adjustment_type {
            AdjustmentType::Add => dto.adjustment_amount < 0.0,
            AdjustmentType::Deduct => dto.adjustment_amount > 0.0,
        };
        if mismatched_sign {
            warn!(
                amount = dto.adjustment_amount,
                adjustment_type = dto.adjustment_type.as_str(),
                "adjustment_amount sign disagrees with adjustment_type; applying the amount as sent"
            );
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin adjustment transaction")
            .map_err(AppError::database)?;

        // One authoritative timestamp for the whole batch.
        let applied_at = Utc::now();

        for person_id in &dto.ids {
            let old_score = sqlx::query_scalar::<_, f64>(
                "SELECT current_score FROM people WHERE id = $1 FOR UPDATE",
            )
            .bind(person_id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to lock person row")
            .map_err(AppError::database)?;

            // Dropping the transaction on this return path rolls back
            // every adjustment already applied in the batch.
            let Some(old_score) = old_score else {
                return Err(AppError::not_found(anyhow::anyhow!(
                    "Person {} not found; batch cancelled",
                    person_id
                )));
            };

            let new_score = old_score + dto.adjustment_amount;

            let updated = sqlx::query("UPDATE people SET current_score = $1 WHERE id = $2")
                .bind(new_score)
                .bind(person_id)
                .execute(&mut *tx)
                .await
                .context("Failed to update score")
                .map_err(AppError::database)?;

            if updated.rows_affected() == 0 {
                return Err(AppError::internal(anyhow::anyhow!(
                    "Failed to update score for person {}",
                    person_id
                )));
            }

            sqlx::query(
                r#"
                INSERT INTO score_changes
                    (person_id, reason, old_score, new_score,
                     adjustment_amount, adjustment_type, "timestamp", updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(person_id)
            .bind(&dto.reason)
            .bind(old_score)
            .bind(new_score)
            .bind(dto.adjustment_amount)
            .bind(dto.adjustment_type)
            .bind(applied_at)
            .bind(&dto.updated_by)
            .execute(&mut *tx)
            .await
            .context("Failed to insert score change record")
            .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit adjustment transaction")
            .map_err(AppError::database)?;

        Ok(AdjustScoresResponse {
            updated_count: dto.ids.len(),
        })
    }
}
