use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::metrics::{set_roster_size, track_person_created, track_person_deleted};
use crate::modules::people::model::{
    CreatePersonDto, HistoryQueryParams, PaginatedHistoryResponse, PaginationMeta, Person,
    PersonWithHistory, UpdatePersonDto,
};
use crate::modules::people::service::PersonService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse, MessageResponse};
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/people",
    request_body = CreatePersonDto,
    responses(
        (status = 201, description = "Person added to the roster", body = Person),
        (status = 400, description = "Bad request or duplicate id", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "People"
)]
#[instrument(skip(state))]
pub async fn create_person(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreatePersonDto>,
) -> Result<(StatusCode, Json<Person>), AppError> {
    let person = PersonService::create_person(&state.db, dto).await?;
    track_person_created(person.user_identity.as_str());

    Ok((StatusCode::CREATED, Json(person)))
}

#[utoipa::path(
    get,
    path = "/api/people",
    responses(
        (status = 200, description = "Roster ordered by name, each person with history newest first", body = [PersonWithHistory]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "People"
)]
#[instrument(skip(state))]
pub async fn get_people(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonWithHistory>>, AppError> {
    let people = PersonService::get_people_with_history(&state.db).await?;
    set_roster_size(people.len() as i64);

    Ok(Json(people))
}

#[utoipa::path(
    get,
    path = "/api/people/{id}",
    params(
        ("id" = String, Path, description = "Roster id")
    ),
    responses(
        (status = 200, description = "Person with history newest first", body = PersonWithHistory),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "People"
)]
#[instrument(skip(state))]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonWithHistory>, AppError> {
    let person = PersonService::get_person_with_history(&state.db, &id).await?;
    Ok(Json(person))
}

#[utoipa::path(
    put,
    path = "/api/people/{id}",
    params(
        ("id" = String, Path, description = "Roster id")
    ),
    request_body = UpdatePersonDto,
    responses(
        (status = 200, description = "Person updated", body = Person),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "People"
)]
#[instrument(skip(state))]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdatePersonDto>,
) -> Result<Json<Person>, AppError> {
    let person = PersonService::update_person(&state.db, &id, dto).await?;
    Ok(Json(person))
}

#[utoipa::path(
    delete,
    path = "/api/people/{id}",
    params(
        ("id" = String, Path, description = "Roster id")
    ),
    responses(
        (status = 200, description = "Person deleted", body = MessageResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "People"
)]
#[instrument(skip(state))]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    PersonService::delete_person(&state.db, &id).await?;
    track_person_deleted();

    Ok(Json(MessageResponse {
        message: "Person deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/people/{id}/history",
    params(
        ("id" = String, Path, description = "Roster id"),
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "One page of the person's adjustment history", body = PaginatedHistoryResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "People"
)]
#[instrument(skip(state))]
pub async fn get_person_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<Json<PaginatedHistoryResponse>, AppError> {
    let limit = params.limit();
    let offset = params.offset();
    let page = params.page();

    let (changes, total) = PersonService::get_history_page(&state.db, &id, limit, offset).await?;

    let total_pages = (total as f64 / limit as f64).ceil() as i64;

    Ok(Json(PaginatedHistoryResponse {
        data: changes,
        meta: PaginationMeta {
            page,
            limit,
            total,
            total_pages,
        },
    }))
}
