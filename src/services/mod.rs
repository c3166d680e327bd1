pub mod analytics_engine;
pub mod api_client;
pub mod export;
pub mod features;
pub mod session;
pub mod validation;
