// backoffice-api: Async Rust client for the backoffice admin REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{LoginResponse, Page, Pagination, UserProfile};
pub use transport::{TlsMode, TransportConfig};
