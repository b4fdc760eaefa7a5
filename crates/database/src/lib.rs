pub mod db;
pub mod entities;
pub mod error;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{ServiceError, ServiceResult};
