//! User entity model.

use monitor_core::dashboard::{user_full_name, Owner};
use monitor_core::types::DbId;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub alias: String,
    pub name: String,
    pub surname: String,
    pub user_type: String,
}

impl User {
    pub fn full_name(&self) -> String {
        user_full_name(&self.alias, &self.name, &self.surname)
    }

    pub fn to_owner(&self) -> Owner {
        Owner {
            id: self.id,
            name: self.full_name(),
        }
    }
}
