//! Client library for the DevicePricePro prediction service: form
//! validation, feature transformation, history analytics, local exports,
//! and the HTTP/auth plumbing around them.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{ApiError, ApiResult};
