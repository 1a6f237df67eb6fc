use crate::modules::people::controller::{
    create_person, delete_person, get_people, get_person, get_person_history, update_person,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_people_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_people).post(create_person))
        .route(
            "/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
        .route("/{id}/history", get(get_person_history))
}
