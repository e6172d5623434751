/// Database configuration and connection management
pub mod database;

/// Shop settings loaded from shop.toml
pub mod shop;

/// Secrets read from environment variables
pub mod secrets;
