//! Project CRUD routes
//!
//! Reads need any authenticated caller; writes take [`AdminUser`], which is
//! extracted before the path and body so a non-admin is refused before any
//! input is looked at.

use crate::{
    api::extract::{ApiJson, ApiPath},
    error::Result,
    middleware::{AdminUser, AuthenticatedUser},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use gatehouse_core::{CreateProject, Project, ProjectId, ProjectStore, UpdateProject};

/// GET /projects
pub async fn list_projects(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Project>>> {
    let projects = app_state.db.list_projects().await?;
    tracing::info!(
        username = %auth.username,
        count = projects.len(),
        "listed projects"
    );
    Ok(Json(projects))
}

/// POST /projects
pub async fn create_project(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(req): ApiJson<CreateProject>,
) -> Result<(StatusCode, Json<Project>)> {
    let project = app_state.db.create_project(req, admin.id).await?;
    tracing::info!(
        admin = %admin.username,
        project_id = %project.id,
        "project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /projects/:id
pub async fn get_project(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<ProjectId>,
) -> Result<Json<Project>> {
    let project = app_state
        .db
        .get_project(id)
        .await
        .inspect_err(|_| tracing::warn!(username = %auth.username, project_id = %id, "project lookup failed"))?;
    Ok(Json(project))
}

/// PUT /projects/:id
pub async fn update_project(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<ProjectId>,
    ApiJson(req): ApiJson<UpdateProject>,
) -> Result<Json<Project>> {
    let project = app_state
        .db
        .update_project(id, req)
        .await
        .inspect_err(|_| tracing::warn!(admin = %admin.username, project_id = %id, "update failed"))?;
    tracing::info!(admin = %admin.username, project_id = %id, "project updated");
    Ok(Json(project))
}

/// DELETE /projects/:id
pub async fn delete_project(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<ProjectId>,
) -> Result<StatusCode> {
    app_state
        .db
        .delete_project(id)
        .await
        .inspect_err(|_| tracing::warn!(admin = %admin.username, project_id = %id, "delete failed"))?;
    tracing::info!(admin = %admin.username, project_id = %id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
