// HTTP server modules
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

// Startup
pub mod catalog;
pub mod config;
pub mod logging;

// Image provider clients
pub mod providers;
