pub mod auth;
pub mod borrow;
pub mod health;
pub mod listings;
pub mod night_market;
pub mod resource;
pub mod users;

pub use self::resource::ResourceService;
