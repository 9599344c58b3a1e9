use serde::{Deserialize, Serialize};
use std::fmt;

use super::project::Label;
use super::user::Actor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub name_with_owner: String,
    pub owner: Actor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub html_url: String,
    pub created_at: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// `None` until fetched on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<RepositoryCollaborator>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCollaborator {
    pub id: String,
    pub login: String,
    pub avatar_url: String,
    pub permission: Permission,
    #[serde(default)]
    pub is_current_user: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl Permission {
    pub fn from_provider(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "ADMIN" => Permission::Admin,
            "MAINTAIN" => Permission::Maintain,
            "WRITE" => Permission::Write,
            "TRIAGE" => Permission::Triage,
            _ => Permission::Read,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Triage => "triage",
            Permission::Write => "write",
            Permission::Maintain => "maintain",
            Permission::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
