//! Roster seeding and maintenance used by the `meritboard-cli` binary.
//!
//! Seeded people carry a `SEED-` id prefix so they can be cleared without
//! touching hand-entered roster entries.

use fake::Fake;
use fake::faker::name::en::Name;
use rand::Rng;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use crate::modules::people::model::PersonIdentity;

/// Id prefix that marks a seeded roster entry.
pub const SEED_ID_PREFIX: &str = "SEED-";

#[derive(Debug, Clone)]
pub struct PersonSeed {
    pub id: String,
    pub user_name: String,
    pub user_identity: PersonIdentity,
    pub score: f64,
}

/// Generates fake roster entries with sequential seeded ids.
pub fn generate_people(count: usize) -> Vec<PersonSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let mut rng = rand::thread_rng();

            let user_identity = match rng.gen_range(0..3) {
                0 => PersonIdentity::Applicant,
                1 => PersonIdentity::Activist,
                _ => PersonIdentity::Member,
            };

            PersonSeed {
                id: format!("{}{:05}", SEED_ID_PREFIX, idx + 1),
                user_name: Name().fake(),
                user_identity,
                score: rng.gen_range(0..=100) as f64,
            }
        })
        .collect()
}

/// Inserts `count` fake people. Ids already present are skipped, so
/// re-seeding is safe. Returns the number of rows actually inserted.
pub async fn seed_people(pool: &PgPool, count: usize) -> Result<u64, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let seeds = generate_people(count);

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for seed in &seeds {
        let result = sqlx::query(
            "INSERT INTO people (id, user_name, user_identity, current_score)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&seed.id)
        .bind(&seed.user_name)
        .bind(seed.user_identity)
        .bind(seed.score)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;

    println!(
        "Seeded {} people ({} already existed) in {:?}",
        inserted,
        seeds.len() as u64 - inserted,
        start.elapsed()
    );

    Ok(inserted)
}

/// Deletes every seeded person (and, by cascade, their score history).
/// Returns the number of people removed.
pub async fn clear_seeded_people(pool: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM people WHERE id LIKE $1")
        .bind(format!("{}%", SEED_ID_PREFIX))
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Adds a single person to the roster with a zero score.
pub async fn add_person(
    pool: &PgPool,
    id: &str,
    user_name: &str,
    user_identity: PersonIdentity,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = sqlx::query(
        "INSERT INTO people (id, user_name, user_identity)
         VALUES ($1, $2, $3)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(user_name)
    .bind(user_identity)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err("Person with this id already exists".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_people_count_and_ids() {
        let seeds = generate_people(25);
        assert_eq!(seeds.len(), 25);
        assert_eq!(seeds[0].id, "SEED-00001");
        assert_eq!(seeds[24].id, "SEED-00025");
        assert!(seeds.iter().all(|s| s.id.starts_with(SEED_ID_PREFIX)));
    }

    #[test]
    fn test_generate_people_scores_in_range() {
        let seeds = generate_people(100);
        assert!(
            seeds
                .iter()
                .all(|s| (0.0..=100.0).contains(&s.score) && !s.user_name.is_empty())
        );
    }
}
