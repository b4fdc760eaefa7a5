pub mod catalog;
pub mod query_reservation;
pub mod reservation;
