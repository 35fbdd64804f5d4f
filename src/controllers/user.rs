//! User directory
//!
//! In-memory registry of users plus the login session that supplies the
//! actor bound on a `ContentController`:
//! - Registration with unique usernames
//! - Login / logout against stored credentials
//! - Permission checks for the logged-in user

use crate::config::UsersConfig;
use crate::models::{Permission, User};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Error types for user directory operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UserDirectoryError {
    /// Username already registered
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// User not found
    #[error("User not found: {0}")]
    NotFound(String),
}

#[derive(Default)]
struct DirectoryState {
    users: Vec<User>,
    session: Option<Uuid>,
}

/// In-memory user directory
#[derive(Default)]
pub struct UserDirectory {
    state: RwLock<DirectoryState>,
}

impl UserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory seeded from configuration
    pub fn from_config(config: &UsersConfig) -> Self {
        let directory = Self::new();
        if config.seed_defaults {
            for seed in &config.defaults {
                let user = User::new(&seed.username, &seed.password, &seed.email, seed.role);
                if let Err(e) = directory.register(user) {
                    tracing::warn!("Skipping seed user: {}", e);
                }
            }
        }
        directory
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a user; usernames must be unique
    pub fn register(&self, user: User) -> Result<(), UserDirectoryError> {
        let mut state = self.write();
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(UserDirectoryError::DuplicateUsername(user.username));
        }
        tracing::info!(username = %user.username, role = %user.role(), "User registered");
        state.users.push(user);
        Ok(())
    }

    /// Authenticate and open a session for the user
    pub fn login(&self, username: &str, password: &str) -> Result<User, UserDirectoryError> {
        let mut state = self.write();
        let user = state
            .users
            .iter()
            .find(|u| u.username == username && u.authenticate(password))
            .cloned()
            .ok_or(UserDirectoryError::InvalidCredentials)?;

        state.session = Some(user.id);
        tracing::info!(username = %user.username, "User logged in");
        Ok(user)
    }

    /// Close the current session
    pub fn logout(&self) {
        self.write().session = None;
    }

    /// User of the current session
    pub fn current_user(&self) -> Option<User> {
        let state = self.read();
        let id = state.session?;
        state.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Check a permission for the current session; false when logged out
    pub fn validate_permission(&self, permission: Permission) -> bool {
        self.current_user()
            .is_some_and(|u| u.has_permission(permission))
    }

    /// Change a user's password after checking the old one
    pub fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), UserDirectoryError> {
        let mut state = self.write();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| UserDirectoryError::NotFound(username.to_string()))?;

        if !user.change_password(old_password, new_password) {
            return Err(UserDirectoryError::InvalidCredentials);
        }
        Ok(())
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Snapshot of all registered users
    pub fn all_users(&self) -> Vec<User> {
        self.read().users.clone()
    }
}
