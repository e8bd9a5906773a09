/// Database configuration and connection management
pub mod database;

/// Spreadsheet import configuration from import.toml
pub mod import;

/// HTTP server settings from environment variables
pub mod server;
