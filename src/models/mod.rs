pub mod analytics;
pub mod auth;
pub mod device;
pub mod prediction;
pub mod record;

pub use analytics::*;
pub use auth::*;
pub use device::*;
pub use prediction::*;
pub use record::*;
