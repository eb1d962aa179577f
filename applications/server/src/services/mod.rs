/// Server services
pub mod accounts;
pub mod auth;
pub mod password;

pub use accounts::AccountService;
pub use auth::{Claims, TokenService};
pub use password::PasswordHasher;
