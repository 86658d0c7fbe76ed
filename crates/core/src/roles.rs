//! User access levels.
//!
//! Levels are ordered: access checks compare against a minimum level.
//! The wire names must match the `user_type` values seeded in
//! `20261019000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Anonymous read-only session; cannot open dashboards.
    Guest,
    User,
    Admin,
    SuperAdmin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Guest => "guest",
            UserType::User => "user",
            UserType::Admin => "admin",
            UserType::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(UserType::Guest),
            "user" => Ok(UserType::User),
            "admin" => Ok(UserType::Admin),
            "super_admin" => Ok(UserType::SuperAdmin),
            other => Err(CoreError::Validation(format!("Unknown user type '{other}'"))),
        }
    }
}

/// The authenticated user a request runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: DbId,
    pub user_type: UserType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(UserType::Guest < UserType::User);
        assert!(UserType::User < UserType::Admin);
        assert!(UserType::Admin < UserType::SuperAdmin);
    }

    #[test]
    fn names_parse_back() {
        for t in [UserType::Guest, UserType::User, UserType::Admin, UserType::SuperAdmin] {
            assert_eq!(t.as_str().parse::<UserType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("root".parse::<UserType>().is_err());
        assert!("".parse::<UserType>().is_err());
    }
}
