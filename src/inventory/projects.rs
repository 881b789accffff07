//! Identity-side project reports: allocation homes and tenant managers.

use crate::clients::{ClientError, IdentityService};
use crate::model::{Project, RoleAssignment, User};
use crate::report::Report;
use std::collections::{BTreeSet, HashMap};

/// Tenant managers per project, resolved to user records.
#[derive(Debug, Default)]
pub struct ManagerIndex<'a> {
    users: HashMap<&'a str, &'a User>,
    managers: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> ManagerIndex<'a> {
    pub fn new(users: &'a [User], assignments: &'a [RoleAssignment]) -> Self {
        let mut managers: HashMap<&str, Vec<&str>> = HashMap::new();
        for a in assignments {
            managers
                .entry(a.project_id.as_str())
                .or_default()
                .push(a.user_id.as_str());
        }
        Self {
            users: users.iter().map(|u| (u.id.as_str(), u)).collect(),
            managers,
        }
    }

    pub fn has_managers(&self, project_id: &str) -> bool {
        self.managers.get(project_id).is_some_and(|m| !m.is_empty())
    }

    fn manager_users(&self, project_id: &str) -> impl Iterator<Item = &'a User> + '_ {
        self.managers
            .get(project_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.users.get(id).copied())
    }

    /// Distinct manager emails, sorted.
    pub fn emails(&self, project_id: &str) -> BTreeSet<&'a str> {
        self.manager_users(project_id)
            .filter_map(|u| u.email.as_deref())
            .collect()
    }

    /// Distinct manager email domains, sorted.
    pub fn email_domains(&self, project_id: &str) -> BTreeSet<&'a str> {
        self.manager_users(project_id)
            .filter_map(User::email_domain)
            .collect()
    }
}

fn join(values: BTreeSet<&str>) -> String {
    values.into_iter().collect::<Vec<_>>().join(",")
}

/// Where each project's allocation lives: the explicit `allocation_home`
/// when set, otherwise the institutions of its managers by email domain.
pub fn allocation_home_report(projects: &[Project], index: &ManagerIndex<'_>) -> Report {
    let mut report = Report::new(["Tenant ID", "Allocation Home(s)"]);
    for project in projects {
        match &project.allocation_home {
            Some(home) => report.push_row(vec![project.id.clone(), home.clone()]),
            None if index.has_managers(&project.id) => report.push_row(vec![
                project.id.clone(),
                join(index.email_domains(&project.id)),
            ]),
            None => {}
        }
    }
    report
}

/// Manager emails of every project that has managers.
pub fn allocation_manager_report(projects: &[Project], index: &ManagerIndex<'_>) -> Report {
    let mut report = Report::new(["Tenant ID", "Manager email(s)"]);
    for project in projects.iter().filter(|p| index.has_managers(&p.id)) {
        report.push_row(vec![project.id.clone(), join(index.emails(&project.id))]);
    }
    report
}

async fn fetch(
    identity: &dyn IdentityService,
    manager_role: &str,
) -> Result<(Vec<Project>, Vec<User>, Vec<RoleAssignment>), ClientError> {
    let users = identity.list_users().await?;
    let projects = identity.list_projects().await?;
    let assignments = identity.list_role_assignments(manager_role).await?;
    tracing::debug!(
        projects = projects.len(),
        users = users.len(),
        assignments = assignments.len(),
        "Fetched identity inventory"
    );
    Ok((projects, users, assignments))
}

pub async fn allocation_homes(
    identity: &dyn IdentityService,
    manager_role: &str,
) -> Result<Report, ClientError> {
    let (projects, users, assignments) = fetch(identity, manager_role).await?;
    let index = ManagerIndex::new(&users, &assignments);
    Ok(allocation_home_report(&projects, &index))
}

pub async fn allocation_managers(
    identity: &dyn IdentityService,
    manager_role: &str,
) -> Result<Report, ClientError> {
    let (projects, users, assignments) = fetch(identity, manager_role).await?;
    let index = ManagerIndex::new(&users, &assignments);
    Ok(allocation_manager_report(&projects, &index))
}
