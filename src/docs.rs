use utoipa::OpenApi;

use crate::modules::people::model::{
    CreatePersonDto, PaginatedHistoryResponse, PaginationMeta, Person, PersonIdentity,
    PersonWithHistory, UpdatePersonDto,
};
use crate::modules::scores::model::{
    AdjustScoresDto, AdjustScoresResponse, AdjustmentType, ScoreChange,
};
use crate::utils::errors::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::people::controller::create_person,
        crate::modules::people::controller::get_people,
        crate::modules::people::controller::get_person,
        crate::modules::people::controller::update_person,
        crate::modules::people::controller::delete_person,
        crate::modules::people::controller::get_person_history,
        crate::modules::scores::controller::adjust_scores,
    ),
    components(
        schemas(
            Person,
            PersonWithHistory,
            PersonIdentity,
            CreatePersonDto,
            UpdatePersonDto,
            PaginationMeta,
            PaginatedHistoryResponse,
            ScoreChange,
            AdjustmentType,
            AdjustScoresDto,
            AdjustScoresResponse,
            ErrorResponse,
            MessageResponse,
        )
    ),
    tags(
        (name = "People", description = "Roster management"),
        (name = "Scores", description = "Audited score adjustments")
    ),
    info(
        title = "Meritboard API",
        description = "Membership roster scoring API with transactional, audited score adjustments"
    )
)]
pub struct ApiDoc;
