//! Gatehouse Core
//!
//! Domain types, storage traits, and error handling shared by the storage
//! layer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Role`, `Project` and their id newtypes
//! - **Storage Traits**: `UserStore` and `ProjectStore`
//! - **Error Handling**: Unified `GateError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use gatehouse_core::types::{CreateProject, RequiredRole, Role};
//!
//! let role: Role = "admin".parse().unwrap();
//! assert!(role.satisfies(RequiredRole::Only(Role::Admin)));
//!
//! let project = CreateProject::new("Apollo", "Lunar landing");
//! assert_eq!(project.name, "Apollo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{GateError, Result};
pub use storage::{ProjectStore, UserStore};

pub use types::{
    CreateProject, NewUser, Project, ProjectId, RequiredRole, Role, UpdateProject, User,
    UserCredentials, UserId,
};
