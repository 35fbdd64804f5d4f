//! User model
//!
//! This module defines the User entity, its roles and the permission
//! vocabulary used to gate content mutations.
//!
//! The permission set of a user is derived solely from its role and is
//! never stored or mutated on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Permissions that gate mutating content operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    /// Add new content
    Create,
    /// Replace or retag existing content
    Edit,
    /// Remove content
    Delete,
    /// Move content between draft and published
    Publish,
}

impl Permission {
    /// Token form of the permission
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Create => "CREATE",
            Permission::Edit => "EDIT",
            Permission::Delete => "DELETE",
            Permission::Publish => "PUBLISH",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" => Ok(Permission::Create),
            "EDIT" => Ok(Permission::Edit),
            "DELETE" => Ok(Permission::Delete),
            "PUBLISH" => Ok(Permission::Publish),
            _ => Err(anyhow::anyhow!("Invalid permission: {}", s)),
        }
    }
}

const ADMINISTRATOR_PERMISSIONS: &[Permission] = &[
    Permission::Create,
    Permission::Edit,
    Permission::Delete,
    Permission::Publish,
];

const EDITOR_PERMISSIONS: &[Permission] = &[Permission::Create, Permission::Edit];

/// User role for authorization.
///
/// - Administrator: create, edit, delete and publish
/// - Editor: create and edit only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access
    Administrator,
    /// Editor - can create and edit content
    Editor,
}

impl UserRole {
    /// Fixed permission set for the role
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            UserRole::Administrator => ADMINISTRATOR_PERMISSIONS,
            UserRole::Editor => EDITOR_PERMISSIONS,
        }
    }

    /// Role tag
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "ADMINISTRATOR",
            UserRole::Editor => "EDITOR",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrator" | "admin" => Ok(UserRole::Administrator),
            "editor" => Ok(UserRole::Editor),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// User entity.
///
/// Credentials are kept in plain text; this crate does not harden
/// authentication.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Username
    pub username: String,
    /// Password
    #[serde(skip_serializing)]
    password: String,
    /// Email address
    pub email: String,
    /// User role
    role: UserRole,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given role.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password: password.into(),
            email: email.into(),
            role,
            registered_at: Utc::now(),
        }
    }

    /// Create an administrator
    pub fn administrator(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self::new(username, password, email, UserRole::Administrator)
    }

    /// Create an editor
    pub fn editor(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self::new(username, password, email, UserRole::Editor)
    }

    /// User role
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Permission set derived from the role
    pub fn permissions(&self) -> &'static [Permission] {
        self.role.permissions()
    }

    /// Check if the user holds the given permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Check the given password against the stored one
    pub fn authenticate(&self, password: &str) -> bool {
        self.password == password
    }

    /// Replace the password if `old_password` matches.
    pub fn change_password(&mut self, old_password: &str, new_password: impl Into<String>) -> bool {
        if !self.authenticate(old_password) {
            return false;
        }
        self.password = new_password.into();
        true
    }

    /// Update profile information
    pub fn update_profile(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}
