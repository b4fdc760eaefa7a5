pub mod access;
pub mod amount;
pub mod payment_status;
pub mod plan;
pub mod role;
pub mod schedule;
pub mod slug;

pub use access::{Visibility, is_authorized};
pub use amount::{AMOUNT_CEILING, stored_amount};
pub use payment_status::PaymentStatus;
pub use plan::PlanTier;
pub use role::{ParseRoleError, Principal, Role};
pub use schedule::{DayRange, TimeWindow, month_bounds};
