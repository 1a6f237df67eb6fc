use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::people::model::{
    CreatePersonDto, Person, PersonIdentity, PersonWithHistory, UpdatePersonDto,
};
use crate::modules::scores::model::ScoreChange;
use crate::utils::errors::AppError;

pub struct PersonService;

impl PersonService {
    #[instrument(skip(db, dto))]
    pub async fn create_person(db: &PgPool, dto: CreatePersonDto) -> Result<Person, AppError> {
        let identity = dto.user_identity.unwrap_or(PersonIdentity::Applicant);
        let initial_score = dto.initial_score.unwrap_or(0.0);

        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (id, user_name, user_identity, current_score)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_name, user_identity, add_timestamp, current_score
            "#,
        )
        .bind(&dto.id)
        .bind(&dto.user_name)
        .bind(identity)
        .bind(initial_score)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Person with id {} already exists",
                        dto.id
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(person)
    }

    /// Full roster ordered by name, each person carrying their history
    /// newest first.
    ///
    /// People and history come back in two queries and are grouped in
    /// memory rather than one history query per person.
    #[instrument(skip(db))]
    pub async fn get_people_with_history(db: &PgPool) -> Result<Vec<PersonWithHistory>, AppError> {
        let people = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, user_name, user_identity, add_timestamp, current_score
            FROM people
            ORDER BY user_name ASC, id ASC
            "#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch people")
        .map_err(AppError::database)?;

        let changes = sqlx::query_as::<_, ScoreChange>(
            r#"
            SELECT id, person_id, reason, old_score, new_score,
                   adjustment_amount, adjustment_type, "timestamp", updated_by
            FROM score_changes
            ORDER BY "timestamp" DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch score history")
        .map_err(AppError::database)?;

        let mut history_by_person: HashMap<String, Vec<ScoreChange>> = HashMap::new();
        for change in changes {
            history_by_person
                .entry(change.person_id.clone())
                .or_default()
                .push(change);
        }

        Ok(people
            .into_iter()
            .map(|person| {
                let history = history_by_person.remove(&person.id).unwrap_or_default();
                person.with_history(history)
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_person(db: &PgPool, id: &str) -> Result<Person, AppError> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, user_name, user_identity, add_timestamp, current_score
            FROM people
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch person by id")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Person {} not found", id)))?;

        Ok(person)
    }

    #[instrument(skip(db))]
    pub async fn get_person_with_history(
        db: &PgPool,
        id: &str,
    ) -> Result<PersonWithHistory, AppError> {
        let person = Self::get_person(db, id).await?;

        let history = sqlx::query_as::<_, ScoreChange>(
            r#"
            SELECT id, person_id, reason, old_score, new_score,
                   adjustment_amount, adjustment_type, "timestamp", updated_by
            FROM score_changes
            WHERE person_id = $1
            ORDER BY "timestamp" DESC, id DESC
            "#,
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch score history for person")
        .map_err(AppError::database)?;

        Ok(person.with_history(history))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_person(
        db: &PgPool,
        id: &str,
        dto: UpdatePersonDto,
    ) -> Result<Person, AppError> {
        let existing = Self::get_person(db, id).await?;

        let user_name = dto.user_name.unwrap_or(existing.user_name);
        let user_identity = dto.user_identity.unwrap_or(existing.user_identity);

        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE people
            SET user_name = $1, user_identity = $2
            WHERE id = $3
            RETURNING id, user_name, user_identity, add_timestamp, current_score
            "#,
        )
        .bind(&user_name)
        .bind(user_identity)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update person")
        .map_err(AppError::database)?;

        Ok(person)
    }

    #[instrument(skip(db))]
    pub async fn delete_person(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete person")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Person {} not found",
                id
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn count_people(db: &PgPool) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM people")
            .fetch_one(db)
            .await
            .context("Failed to count people")
            .map_err(AppError::database)?;

        Ok(count)
    }

    /// One page of a person's history, newest first, plus the total
    /// number of records. 404s when the person does not exist.
    #[instrument(skip(db))]
    pub async fn get_history_page(
        db: &PgPool,
        id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScoreChange>, i64), AppError> {
        Self::get_person(db, id).await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM score_changes WHERE person_id = $1",
        )
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to count score history")
        .map_err(AppError::database)?;

        let changes = sqlx::query_as::<_, ScoreChange>(
            r#"
            SELECT id, person_id, reason, old_score, new_score,
                   adjustment_amount, adjustment_type, "timestamp", updated_by
            FROM score_changes
            WHERE person_id = $1
            ORDER BY "timestamp" DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch score history page")
        .map_err(AppError::database)?;

        Ok((changes, total))
    }
}
