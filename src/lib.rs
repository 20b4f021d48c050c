pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
