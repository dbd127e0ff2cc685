pub mod controller;
pub mod google;
pub mod identity;
pub mod router;
pub mod service;
