pub mod court;
pub mod reservation;
pub mod venue;
