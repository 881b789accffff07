//! Identity service entities.

use serde::{Deserialize, Serialize};

/// A canonical tenant (project) as known to the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

/// A project listing entry, including the optional allocation home extra
/// attribute operators set on projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub allocation_home: Option<String>,
}

impl From<Project> for Tenant {
    fn from(project: Project) -> Self {
        Tenant {
            id: project.id,
            name: project.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Domain part of the user's email address.
    pub fn email_domain(&self) -> Option<&str> {
        let email = self.email.as_deref()?;
        email.rsplit('@').next().filter(|domain| !domain.is_empty())
    }
}

/// A user holding a role on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: String,
    pub project_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain() {
        let user = User {
            id: "u1".to_string(),
            name: "alice".to_string(),
            email: Some("alice@unimelb.edu.au".to_string()),
        };
        assert_eq!(user.email_domain(), Some("unimelb.edu.au"));
    }

    #[test]
    fn test_email_domain_missing() {
        let user = User {
            id: "u1".to_string(),
            name: "alice".to_string(),
            email: None,
        };
        assert_eq!(user.email_domain(), None);
    }
}
