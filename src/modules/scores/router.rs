use crate::modules::scores::controller::adjust_scores;
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_scores_router() -> Router<AppState> {
    Router::new().route("/adjust", post(adjust_scores))
}
