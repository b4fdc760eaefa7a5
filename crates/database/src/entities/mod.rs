pub mod court_images;
pub mod courts;
pub mod plans;
pub mod reservations;
pub mod subscriptions;
pub mod users;
pub mod venues;
