use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Application-level role stored on the user record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    Developer,
    User,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Developer => write!(f, "developer"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            "developer" => UserRole::Developer,
            _ => UserRole::User,
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl NewUser {
    #[must_use]
    pub fn new(name: String, email: String, role: UserRole) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.to_lowercase().trim().to_string(),
            role,
        }
    }
}
