//! Seeded listings, borrow requests and night market posts.

use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{
    BorrowRequestSeed, ContentPerStudent, ListingSeed, NightMarketSeed, SEED_EMAIL_DOMAIN,
    SeededUser,
};

const LISTING_CATALOG: [(&str, &[&str]); 5] = [
    (
        "Books",
        &["Calculus textbook", "Organic chemistry notes", "Engineering drawing set"],
    ),
    (
        "Electronics",
        &["Scientific calculator", "Bluetooth speaker", "Used laptop charger"],
    ),
    ("Furniture", &["Reading table", "Plastic chair", "Bookshelf"]),
    ("Appliances", &["Mini fridge", "Electric kettle", "Standing fan"]),
    ("Clothing", &["Lab coat", "Graduation gown", "Sports jersey"]),
];

const CONDITIONS: [&str; 4] = ["New", "Like new", "Good", "Fair"];

const LOCATIONS: [&str; 4] = ["Library entrance", "Faculty of Science", "Main gate", "Student union"];

const BORROW_ITEMS: [&str; 6] = [
    "Drawing board",
    "Lab coat",
    "Stethoscope",
    "Extension cable",
    "Formal suit",
    "Camera",
];

const NEEDED_FOR: [&str; 4] = ["1 day", "2 days", "1 week", "The weekend"];

const NIGHT_MARKET_ITEMS: [&str; 6] = [
    "Indomie",
    "Suya",
    "Puff-puff",
    "Fried rice",
    "Zobo drink",
    "Meat pie",
];

fn pick<'a>(options: &[&'a str]) -> &'a str {
    options.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

/// Generates listings for every seller.
pub fn generate_listings(sellers: &[SeededUser], per_seller: usize) -> Vec<ListingSeed> {
    sellers
        .par_iter()
        .flat_map_iter(|seller| {
            (0..per_seller).map(move |_| {
                let mut rng = rand::thread_rng();
                let (category, titles) = LISTING_CATALOG[rng.gen_range(0..LISTING_CATALOG.len())];

                ListingSeed {
                    seller_id: seller.id,
                    title: pick(titles).to_string(),
                    description: Sentence(6..14).fake(),
                    category: category.to_string(),
                    price: f64::from(rng.gen_range(2..400_u32) * 50),
                    condition: pick(&CONDITIONS).to_string(),
                    location: pick(&LOCATIONS).to_string(),
                    negotiable: rng.gen_bool(0.5),
                }
            })
        })
        .collect()
}

pub fn generate_borrow_requests(
    requesters: &[SeededUser],
    per_requester: usize,
) -> Vec<BorrowRequestSeed> {
    requesters
        .par_iter()
        .flat_map_iter(|requester| {
            (0..per_requester).map(move |_| {
                let low = rand::thread_rng().gen_range(1..20_u32) * 100;
                BorrowRequestSeed {
                    requester_id: requester.id,
                    item_name: pick(&BORROW_ITEMS).to_string(),
                    reason: Sentence(4..10).fake(),
                    budget_range: format!("{}-{}", low, low * 2),
                    needed_for: pick(&NEEDED_FOR).to_string(),
                }
            })
        })
        .collect()
}

/// Posts are sold from the seller's own hostel.
pub fn generate_night_market_posts(
    sellers: &[SeededUser],
    per_seller: usize,
) -> Vec<NightMarketSeed> {
    sellers
        .par_iter()
        .flat_map_iter(|seller| {
            (0..per_seller).map(move |_| {
                let mut rng = rand::thread_rng();
                NightMarketSeed {
                    seller_id: seller.id,
                    item: pick(&NIGHT_MARKET_ITEMS).to_string(),
                    price: f64::from(rng.gen_range(2..40_u32) * 50),
                    quantity: rng.gen_range(1..=20),
                    hostel: seller.hostel.clone(),
                }
            })
        })
        .collect()
}

/// Seeds all marketplace content for `students`. Returns the number of rows.
pub async fn seed_marketplace(
    db: &PgPool,
    students: &[SeededUser],
    content: &ContentPerStudent,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🛒 Seeding marketplace content for {} students ({} listings, {} borrow requests, {} posts each)...",
        students.len(),
        content.listings,
        content.borrow_requests,
        content.night_market_posts
    );

    let listings = generate_listings(students, content.listings);
    let requests = generate_borrow_requests(students, content.borrow_requests);
    let posts = generate_night_market_posts(students, content.night_market_posts);

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in listings.chunks(500) {
        inserted += insert_listings_chunk(&mut tx, chunk).await?;
    }
    for chunk in requests.chunks(1000) {
        inserted += insert_borrow_requests_chunk(&mut tx, chunk).await?;
    }
    for chunk in posts.chunks(1000) {
        inserted += insert_night_market_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} records in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

/// `($1, $2, ...), ($n+1, ...)` for `rows` tuples of `width` params.
fn values_clause(rows: usize, width: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=width)
                .map(|col| format!("${}", row * width + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn insert_listings_chunk(
    tx: &mut Transaction<'_, Postgres>,
    listings: &[ListingSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if listings.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO listings (seller_id, title, description, category, price, \"condition\", location, negotiable) VALUES {}",
        values_clause(listings.len(), 8)
    );

    let mut q = sqlx::query(&query);
    for listing in listings {
        q = q
            .bind(listing.seller_id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.category)
            .bind(listing.price)
            .bind(&listing.condition)
            .bind(&listing.location)
            .bind(listing.negotiable);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

async fn insert_borrow_requests_chunk(
    tx: &mut Transaction<'_, Postgres>,
    requests: &[BorrowRequestSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if requests.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO borrow_requests (requester_id, item_name, reason, budget_range, needed_for) VALUES {}",
        values_clause(requests.len(), 5)
    );

    let mut q = sqlx::query(&query);
    for request in requests {
        q = q
            .bind(request.requester_id)
            .bind(&request.item_name)
            .bind(&request.reason)
            .bind(&request.budget_range)
            .bind(&request.needed_for);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

async fn insert_night_market_chunk(
    tx: &mut Transaction<'_, Postgres>,
    posts: &[NightMarketSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if posts.is_empty() {
        return Ok(0);
    }

    let query = format!(
        "INSERT INTO night_market_posts (seller_id, item, price, quantity, hostel) VALUES {}",
        values_clause(posts.len(), 5)
    );

    let mut q = sqlx::query(&query);
    for post in posts {
        q = q
            .bind(post.seller_id)
            .bind(&post.item)
            .bind(post.price)
            .bind(post.quantity)
            .bind(&post.hostel);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

/// Hard-deletes content owned by seeded accounts.
pub async fn clear_marketplace(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded marketplace content...");

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;
    let mut deleted = 0;
    for (table, owner_column) in [
        ("listings", "seller_id"),
        ("borrow_requests", "requester_id"),
        ("night_market_posts", "seller_id"),
    ] {
        let query = format!(
            "DELETE FROM {} WHERE {} IN (SELECT id FROM users WHERE email LIKE $1)",
            table, owner_column
        );
        deleted += sqlx::query(&query)
            .bind(&pattern)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;

    println!(
        "   ✓ Deleted {} records in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sellers(n: usize) -> Vec<SeededUser> {
        (0..n)
            .map(|i| SeededUser {
                id: Uuid::new_v4(),
                hostel: format!("Hall {}", i),
            })
            .collect()
    }

    #[test]
    fn test_listings_are_valid() {
        let sellers = sellers(4);
        let listings = generate_listings(&sellers, 3);

        assert_eq!(listings.len(), 12);
        for listing in &listings {
            assert!(listing.price > 0.0);
            assert!(!listing.title.is_empty());
            assert!(!listing.description.is_empty());
            assert!(sellers.iter().any(|s| s.id == listing.seller_id));
        }
    }

    #[test]
    fn test_night_market_posts_use_seller_hostel() {
        let sellers = sellers(3);
        let posts = generate_night_market_posts(&sellers, 2);

        assert_eq!(posts.len(), 6);
        for post in &posts {
            let seller = sellers.iter().find(|s| s.id == post.seller_id).unwrap();
            assert_eq!(post.hostel, seller.hostel);
            assert!(post.quantity >= 1);
        }
    }

    #[test]
    fn test_borrow_requests_have_budget_range() {
        let requests = generate_borrow_requests(&sellers(2), 2);
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|r| r.budget_range.contains('-')));
    }

    #[test]
    fn test_values_clause() {
        assert_eq!(values_clause(2, 3), "($1, $2, $3), ($4, $5, $6)");
    }
}
