mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{count_score_changes, insert_person, insert_score_change, unique_person_id};
use http_body_util::BodyExt;
use meritboard::config::cors::CorsConfig;
use meritboard::config::rate_limit::RateLimitConfig;
use meritboard::router::init_router;
use meritboard::state::AppState;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    };
    init_router(state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_person_with_defaults(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let id = unique_person_id();

    let request = json_request(
        "POST",
        "/api/people",
        json!({
            "id": id,
            "user_name": "Li Wei"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["user_name"], "Li Wei");
    assert_eq!(body["user_identity"], "applicant");
    assert_eq!(body["current_score"], 0.0);
    assert!(body["add_timestamp"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_person_with_initial_values(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let id = unique_person_id();

    let request = json_request(
        "POST",
        "/api/people",
        json!({
            "id": id,
            "user_name": "Chen Fang",
            "user_identity": "member",
            "initial_score": 12.5
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["user_identity"], "member");
    assert_eq!(body["current_score"], 12.5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_person_duplicate_id(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = unique_person_id();
    insert_person(&mut tx, &id, "Existing", "applicant", 0.0).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let request = json_request(
        "POST",
        "/api/people",
        json!({
            "id": id,
            "user_name": "Someone Else"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_person_rejects_empty_name(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/people",
        json!({
            "id": unique_person_id(),
            "user_name": ""
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_people_ordered_with_history(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let first = unique_person_id();
    let second = unique_person_id();
    insert_person(&mut tx, &second, "Bravo", "activist", 3.0).await;
    insert_person(&mut tx, &first, "Alpha", "applicant", 5.0).await;
    insert_score_change(&mut tx, &first, "first adjustment", 0.0, 2.0).await;
    insert_score_change(&mut tx, &first, "second adjustment", 2.0, 5.0).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let response = app.oneshot(get_request("/api/people")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let people = body.as_array().unwrap();
    assert_eq!(people.len(), 2);

    // Ordered by user_name ascending
    assert_eq!(people[0]["user_name"], "Alpha");
    assert_eq!(people[1]["user_name"], "Bravo");

    // History embedded, newest first
    assert_eq!(people[0]["score"], 5.0);
    let history = people[0]["score_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["reason"], "second adjustment");
    assert_eq!(history[1]["reason"], "first adjustment");

    assert_eq!(people[1]["score_history"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_person_with_history(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = unique_person_id();
    insert_person(&mut tx, &id, "Zhang San", "activist", 8.0).await;
    insert_score_change(&mut tx, &id, "duty shift", 0.0, 8.0).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(get_request(&format!("/api/people/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["score"], 8.0);
    assert_eq!(body["score_history"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_person_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(get_request("/api/people/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_person_partial(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = unique_person_id();
    insert_person(&mut tx, &id, "Wang Er", "applicant", 7.0).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let request = json_request(
        "PUT",
        &format!("/api/people/{}", id),
        json!({
            "user_identity": "activist"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["user_name"], "Wang Er");
    assert_eq!(body["user_identity"], "activist");
    // Roster updates never touch the score
    assert_eq!(body["current_score"], 7.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_person_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "PUT",
        "/api/people/does-not-exist",
        json!({
            "user_name": "Nobody"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_person_cascades_history(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = unique_person_id();
    insert_person(&mut tx, &id, "Zhao Liu", "member", 20.0).await;
    insert_score_change(&mut tx, &id, "annual review", 0.0, 20.0).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/people/{}", id))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/people/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(count_score_changes(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_person_history_pagination(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = unique_person_id();
    insert_person(&mut tx, &id, "Sun Qi", "activist", 6.0).await;
    insert_score_change(&mut tx, &id, "adjustment one", 0.0, 2.0).await;
    insert_score_change(&mut tx, &id, "adjustment two", 2.0, 4.0).await;
    insert_score_change(&mut tx, &id, "adjustment three", 4.0, 6.0).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/people/{}/history?page=1&limit=2",
            id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["reason"], "adjustment three");
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["total_pages"], 2);

    let response = app
        .oneshot(get_request(&format!(
            "/api/people/{}/history?page=2&limit=2",
            id
        )))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["reason"], "adjustment one");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_person_history_unknown_person(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(get_request("/api/people/does-not-exist/history"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
