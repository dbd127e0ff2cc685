//! Seeded accounts: one admin plus fake students spread over the hostels.

use campusmart_models::UserRole;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::CellNumber;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{CAMPUSES, HOSTELS, SEED_EMAIL_DOMAIN, SeededUser, UserSeed};

/// The demo administrator. Always `admin@<seed domain>`.
pub fn admin_seed(password_hash: &str) -> UserSeed {
    UserSeed {
        name: "Campusmart Admin".to_string(),
        email: format!("admin@{}", SEED_EMAIL_DOMAIN),
        password_hash: password_hash.to_string(),
        phone_number: "08000000000".to_string(),
        campus: CAMPUSES[0].to_string(),
        hostel: HOSTELS[0].to_string(),
        role: UserRole::Admin,
    }
}

/// Generates students round-robin across hostels and campuses.
pub fn generate_students(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            UserSeed {
                email: student_email(&first_name, &last_name, idx),
                name: format!("{} {}", first_name, last_name),
                password_hash: password_hash.to_string(),
                phone_number: CellNumber().fake(),
                campus: CAMPUSES[idx % CAMPUSES.len()].to_string(),
                hostel: HOSTELS[idx % HOSTELS.len()].to_string(),
                role: UserRole::Student,
            }
        })
        .collect()
}

fn student_email(first_name: &str, last_name: &str, idx: usize) -> String {
    let local: String = format!("{}.{}", first_name, last_name)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    format!("{}+{}@{}", local, idx, SEED_EMAIL_DOMAIN)
}

/// Seeds the admin and `count` students. Existing seeded emails are skipped.
pub async fn seed_users(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<SeededUser>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding 1 admin and {} students...", count);

    let mut users = vec![admin_seed(password_hash)];
    users.extend(generate_students(count, password_hash));
    let seeded = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        seeded.len(),
        start_time.elapsed()
    );

    Ok(seeded)
}

/// Inserts users in batches and returns the students that were created.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<SeededUser>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 7 params per user
    const BATCH_SIZE: usize = 1000;
    let mut seeded = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        seeded.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(seeded)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<SeededUser>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (name, email, password_hash, phone_number, campus, hostel, role) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 7;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5,
            param_idx + 6,
            param_idx + 7
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING RETURNING id, hostel, role");

    let mut q = sqlx::query(&query);
    for user in users {
        q = q
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.phone_number)
            .bind(&user.campus)
            .bind(&user.hostel)
            .bind(user.role);
    }

    let rows = q.fetch_all(&mut **tx).await?;
    let mut seeded = Vec::with_capacity(rows.len());
    for row in rows {
        let role: UserRole = row.try_get("role")?;
        if role != UserRole::Student {
            continue;
        }
        seeded.push(SeededUser {
            id: row.try_get::<Uuid, _>("id")?,
            hostel: row.try_get::<Option<String>, _>("hostel")?.unwrap_or_default(),
        });
    }
    Ok(seeded)
}

/// Hard-deletes every seeded account. Run after their content is gone.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
