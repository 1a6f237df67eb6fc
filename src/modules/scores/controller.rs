use axum::{Json, extract::State};
use tracing::instrument;

use crate::metrics::track_scores_adjusted;
use crate::modules::scores::model::{AdjustScoresDto, AdjustScoresResponse};
use crate::modules::scores::service::ScoreService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/scores/adjust",
    request_body = AdjustScoresDto,
    responses(
        (status = 200, description = "Batch applied atomically", body = AdjustScoresResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "A person in the batch does not exist; nothing was applied", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Scores"
)]
#[instrument(skip(state, dto))]
pub async fn adjust_scores(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AdjustScoresDto>,
) -> Result<Json<AdjustScoresResponse>, AppError> {
    let adjustment_type = dto.adjustment_type;
    let batch_size = dto.ids.len();

    let response = ScoreService::adjust_scores(&state.db, dto).await?;
    track_scores_adjusted(adjustment_type.as_str(), batch_size);

    Ok(Json(response))
}
