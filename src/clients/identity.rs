//! Keystone v3 identity client.

use super::{join_url, map_send_error, read_json, ClientError, IdentityService, Session};
use crate::model::{Project, RoleAssignment, Tenant, User};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

/// Identity client talking to the versioned `auth_url` endpoint.
pub struct KeystoneClient {
    session: Arc<Session>,
}

impl KeystoneClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, ClientError> {
        let url = join_url(self.session.auth_url(), segments)?;
        tracing::debug!(url = %url, "GET identity");
        let response = self
            .session
            .client()
            .get(url)
            .query(query)
            .header("x-auth-token", self.session.token())
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response, what).await
    }
}

#[derive(Deserialize)]
struct ProjectResponse {
    project: Project,
}

#[derive(Deserialize)]
struct ProjectsResponse {
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct RoleAssignmentsResponse {
    role_assignments: Vec<RawAssignment>,
}

#[derive(Deserialize)]
struct RawAssignment {
    #[serde(default)]
    user: Option<IdRef>,
    #[serde(default)]
    scope: Option<RawScope>,
}

#[derive(Deserialize)]
struct RawScope {
    #[serde(default)]
    project: Option<IdRef>,
}

#[derive(Deserialize)]
struct IdRef {
    id: String,
}

#[async_trait]
impl IdentityService for KeystoneClient {
    async fn resolve_tenant(&self, name_or_id: &str) -> Result<Tenant, ClientError> {
        match self
            .get::<ProjectResponse>(&["projects", name_or_id], &[], "project")
            .await
        {
            Ok(found) => return Ok(found.project.into()),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let by_name: ProjectsResponse = self
            .get(&["projects"], &[("name", name_or_id)], "project list")
            .await?;
        by_name
            .projects
            .into_iter()
            .next()
            .map(Tenant::from)
            .ok_or_else(|| ClientError::NotFound(format!("tenant {}", name_or_id)))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response: ProjectsResponse = self.get(&["projects"], &[], "project list").await?;
        Ok(response.projects)
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let response: UsersResponse = self.get(&["users"], &[], "user list").await?;
        Ok(response.users)
    }

    async fn list_role_assignments(
        &self,
        role_id: &str,
    ) -> Result<Vec<RoleAssignment>, ClientError> {
        let response: RoleAssignmentsResponse = self
            .get(&["role_assignments"], &[("role.id", role_id)], "role assignments")
            .await?;

        // Group and domain scoped assignments carry no user/project pair.
        Ok(response
            .role_assignments
            .into_iter()
            .filter_map(|a| {
                let user = a.user?;
                let project = a.scope?.project?;
                Some(RoleAssignment {
                    user_id: user.id,
                    project_id: project.id,
                })
            })
            .collect())
    }
}
