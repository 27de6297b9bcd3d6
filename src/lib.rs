// Storefront client - library root

pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod preferences;
pub mod services;
pub mod storage;

pub use error::ApiError;
pub use http_client::ApiClient;
