/// Project domain types
use super::ids::{ProjectId, UserId};
use serde::{Deserialize, Serialize};

/// A project record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    /// Admin who created the project; `None` once that account is gone
    pub user_id: Option<UserId>,
}

/// Data for creating a project
///
/// The owner is not part of the request body; the store takes it separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
}

impl CreateProject {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Partial update of a project; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateProject {
    /// Whether the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
