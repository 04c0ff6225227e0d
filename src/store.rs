//! In-memory credential store
//!
//! Holds the user directory for the lifetime of the process; nothing is
//! persisted across restarts. Records keep their insertion order, which
//! is observable through the list endpoint.
//!
//! # Storage Note
//!
//! Passwords are held and compared as raw strings; clients read them back
//! through the self-lookup route. The comparison lives behind
//! [`UserStore::authenticate`] so a salted-hash scheme could be
//! substituted without touching call sites.
//!
//! # Concurrency
//!
//! The store is shared across handler tasks. Every mutating operation holds
//! the write lock across its whole read-modify-write sequence, so duplicate
//! usernames cannot be inserted by racing registrations and password
//! updates cannot be lost.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// A user record. `username` is the unique key; uniqueness is enforced at
/// insert only, never re-validated on mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Public projection of a record: everything except the password.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Store operation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert attempted with a username that already exists
    DuplicateUser(String),
    /// Mutation attempted for a username with no record
    NotFound(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUser(name) => write!(f, "username '{}' is already taken", name),
            Self::NotFound(name) => write!(f, "no user named '{}'", name),
        }
    }
}

impl std::error::Error for StoreError {}

/// Shared in-memory user directory.
///
/// Cloning is cheap; all clones view the same records.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a sample record, handy for
    /// development and demos.
    pub fn seeded() -> Self {
        let store = Self::new();
        let _ = store.insert(User {
            username: "sampleUser".to_string(),
            password: "samplePass".to_string(),
            email: Some("sample@example.com".to_string()),
            first_name: Some("Sample".to_string()),
            last_name: Some("User".to_string()),
        });
        store
    }

    /// Look up a record by username.
    pub fn find(&self, username: &str) -> Option<User> {
        let users = self.users.read().unwrap();
        users.iter().find(|u| u.username == username).cloned()
    }

    /// Whether a record with this username exists.
    pub fn exists(&self, username: &str) -> bool {
        let users = self.users.read().unwrap();
        users.iter().any(|u| u.username == username)
    }

    /// Append a record, failing if the username is taken. The existence
    /// check and the push happen under one write lock.
    pub fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUser(user.username));
        }
        users.push(user);
        Ok(())
    }

    /// Overwrite a record's password in place.
    pub fn update_password(&self, username: &str, new_password: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap();
        match users.iter_mut().find(|u| u.username == username) {
            Some(user) => {
                user.password = new_password.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(username.to_string())),
        }
    }

    /// Remove a record.
    pub fn delete(&self, username: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap();
        match users.iter().position(|u| u.username == username) {
            Some(index) => {
                users.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound(username.to_string())),
        }
    }

    /// Linear credential scan: first record matching both username and
    /// password wins. Returns the matched record.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let users = self.users.read().unwrap();
        users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned()
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.users.read().unwrap().clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, pass: &str) -> User {
        User {
            username: name.to_string(),
            password: pass.to_string(),
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn insert_and_find() {
        let store = UserStore::new();
        store.insert(user("alice", "pw1")).unwrap();

        assert!(store.exists("alice"));
        assert!(!store.exists("bob"));

        let found = store.find("alice").unwrap();
        assert_eq!(found.password, "pw1");
        assert!(store.find("bob").is_none());
    }

    #[test]
    fn duplicate_insert_rejected_and_store_unchanged() {
        let store = UserStore::new();
        store.insert(user("alice", "pw1")).unwrap();

        let err = store.insert(user("alice", "other")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateUser("alice".to_string()));
        assert_eq!(store.len(), 1);
        // Original record untouched
        assert_eq!(store.find("alice").unwrap().password, "pw1");
    }

    #[test]
    fn update_password_in_place() {
        let store = UserStore::new();
        store.insert(user("alice", "pw1")).unwrap();

        store.update_password("alice", "pw2").unwrap();
        assert_eq!(store.find("alice").unwrap().password, "pw2");

        let err = store.update_password("bob", "x").unwrap_err();
        assert_eq!(err, StoreError::NotFound("bob".to_string()));
    }

    #[test]
    fn delete_removes_record() {
        let store = UserStore::new();
        store.insert(user("alice", "pw1")).unwrap();
        store.insert(user("bob", "pw2")).unwrap();

        store.delete("alice").unwrap();
        assert!(!store.exists("alice"));
        assert_eq!(store.len(), 1);

        let err = store.delete("alice").unwrap_err();
        assert_eq!(err, StoreError::NotFound("alice".to_string()));
    }

    #[test]
    fn authenticate_requires_exact_match() {
        let store = UserStore::new();
        store.insert(user("alice", "pw1")).unwrap();

        assert!(store.authenticate("alice", "pw1").is_some());
        assert!(store.authenticate("alice", "wrong").is_none());
        assert!(store.authenticate("nobody", "pw1").is_none());
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = UserStore::new();
        store.insert(user("c", "1")).unwrap();
        store.insert(user("a", "2")).unwrap();
        store.insert(user("b", "3")).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn seeded_store_contains_sample_user() {
        let store = UserStore::seeded();
        let sample = store.find("sampleUser").unwrap();
        assert_eq!(sample.password, "samplePass");
        assert_eq!(sample.email.as_deref(), Some("sample@example.com"));
    }

    #[test]
    fn concurrent_registration_admits_one_winner() {
        use std::thread;

        let store = UserStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || store.insert(user("alice", &format!("pw{}", i))).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.len(), 1);
    }
}
