use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Insert a roster entry directly, bypassing the API.
pub async fn insert_person(
    tx: &mut Transaction<'_, Postgres>,
    id: &str,
    user_name: &str,
    user_identity: &str,
    score: f64,
) {
    sqlx::query(
        "INSERT INTO people (id, user_name, user_identity, current_score)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(user_name)
    .bind(user_identity)
    .bind(score)
    .execute(&mut **tx)
    .await
    .unwrap();
}

/// Insert an audit record directly, bypassing the API.
#[allow(dead_code)]
pub async fn insert_score_change(
    tx: &mut Transaction<'_, Postgres>,
    person_id: &str,
    reason: &str,
    old_score: f64,
    new_score: f64,
) {
    sqlx::query(
        "INSERT INTO score_changes
            (person_id, reason, old_score, new_score,
             adjustment_amount, adjustment_type, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(person_id)
    .bind(reason)
    .bind(old_score)
    .bind(new_score)
    .bind(new_score - old_score)
    .bind(if new_score >= old_score {
        "add"
    } else {
        "deduct"
    })
    .bind("test-admin")
    .execute(&mut **tx)
    .await
    .unwrap();
}

pub fn unique_person_id() -> String {
    format!("P-{}", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn count_score_changes(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM score_changes")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn fetch_score(pool: &PgPool, id: &str) -> f64 {
    sqlx::query_scalar::<_, f64>("SELECT current_score FROM people WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}
