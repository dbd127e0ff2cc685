//! Seed records and seeding configuration.

use campusmart_models::UserRole;
use uuid::Uuid;

/// Every seeded account uses this email domain so `clear` can find them.
pub const SEED_EMAIL_DOMAIN: &str = "seed.campusmart.test";

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

pub const HOSTELS: [&str; 6] = [
    "Hall 1",
    "Hall 2",
    "Hall 3",
    "Queens Hall",
    "Kings Hall",
    "Annex",
];

pub const CAMPUSES: [&str; 2] = ["Main Campus", "Medical Campus"];

pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub campus: String,
    pub hostel: String,
    pub role: UserRole,
}

/// A seeded user as stored, with what content generation needs.
#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: Uuid,
    pub hostel: String,
}

pub struct ListingSeed {
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub condition: String,
    pub location: String,
    pub negotiable: bool,
}

pub struct BorrowRequestSeed {
    pub requester_id: Uuid,
    pub item_name: String,
    pub reason: String,
    pub budget_range: String,
    pub needed_for: String,
}

pub struct NightMarketSeed {
    pub seller_id: Uuid,
    pub item: String,
    pub price: f64,
    pub quantity: i32,
    pub hostel: String,
}

/// Content generated per seeded student.
#[derive(Clone)]
pub struct ContentPerStudent {
    pub listings: usize,
    pub borrow_requests: usize,
    pub night_market_posts: usize,
}

impl Default for ContentPerStudent {
    fn default() -> Self {
        Self {
            listings: 3,
            borrow_requests: 1,
            night_market_posts: 1,
        }
    }
}

/// Complete configuration for a seeding run.
#[derive(Clone, Default)]
pub struct SeedConfig {
    pub num_students: usize,
    pub content: ContentPerStudent,
}

impl SeedConfig {
    pub fn new(num_students: usize) -> Self {
        Self {
            num_students,
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: ContentPerStudent) -> Self {
        self.content = content;
        self
    }

    /// Listings, borrow requests and posts across all students.
    pub fn total_records(&self) -> usize {
        self.num_students
            * (self.content.listings + self.content.borrow_requests + self.content.night_market_posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_records() {
        let config = SeedConfig::new(10).with_content(ContentPerStudent {
            listings: 2,
            borrow_requests: 1,
            night_market_posts: 0,
        });
        assert_eq!(config.total_records(), 30);
        assert_eq!(SeedConfig::new(4).total_records(), 20);
    }
}
