//! Gatehouse Server Library
//!
//! HTTP API with user registration, bearer-token login, and role-gated
//! project CRUD.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{AccountService, PasswordHasher, TokenService};
pub use state::AppState;
