//! Demo data seeding.
//!
//! Every seeded account lives under [`SEED_EMAIL_DOMAIN`] and shares
//! [`SEED_PASSWORD`], so a developer can sign in as any of them and `clear`
//! can remove exactly what `seed` created.

pub mod marketplace;
pub mod models;
pub mod users;

use campusmart_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

pub use models::{ContentPerStudent, SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig};

/// Seeds users then marketplace content in one run.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("\n🌱 Seeding demo data...\n");

    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| e.error)?;
    let students = users::seed_users(db, config.num_students, &password_hash).await?;
    marketplace::seed_marketplace(db, &students, &config.content).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    println!("   Admin: admin@{}", SEED_EMAIL_DOMAIN);
    println!("   Password for every seeded account: {}", SEED_PASSWORD);
    Ok(())
}

/// Hard-deletes everything `seed_all` created.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("\n🧹 Clearing seeded data...\n");

    marketplace::clear_marketplace(db).await?;
    users::clear_users(db).await?;

    println!("\n✅ Cleared in {:?}", start_time.elapsed());
    Ok(())
}
