mod ids;
mod project;
mod user;

pub use ids::{ProjectId, UserId};
pub use project::{CreateProject, Project, UpdateProject};
pub use user::{NewUser, RequiredRole, Role, User, UserCredentials};
