//! Repository for the `profiles` table (per-user preferences).
//!
//! Reads fall back to a caller-supplied default when the key is unset, so a
//! missing preference is never an error.

use std::collections::HashMap;

use monitor_core::profile::ProfileValue;
use monitor_core::types::DbId;
use sqlx::PgPool;

/// Provides get/update access to a user's stored preferences.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Read an id-typed preference.
    pub async fn get_id(
        pool: &PgPool,
        user_id: DbId,
        idx: &str,
        default: DbId,
    ) -> Result<DbId, sqlx::Error> {
        let value = sqlx::query_scalar::<_, DbId>(
            "SELECT value_id FROM profiles WHERE user_id = $1 AND idx = $2 AND idx2 = 0",
        )
        .bind(user_id)
        .bind(idx)
        .fetch_optional(pool)
        .await?;
        Ok(value.unwrap_or(default))
    }

    /// Read an integer preference.
    pub async fn get_int(
        pool: &PgPool,
        user_id: DbId,
        idx: &str,
        default: i32,
    ) -> Result<i32, sqlx::Error> {
        let value = sqlx::query_scalar::<_, i32>(
            "SELECT value_int FROM profiles WHERE user_id = $1 AND idx = $2 AND idx2 = 0",
        )
        .bind(user_id)
        .bind(idx)
        .fetch_optional(pool)
        .await?;
        Ok(value.unwrap_or(default))
    }

    /// Every integer value stored under `idx`, keyed by `idx2`.
    pub async fn list_int_by_idx2(
        pool: &PgPool,
        user_id: DbId,
        idx: &str,
    ) -> Result<HashMap<DbId, i32>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (DbId, i32)>(
            "SELECT idx2, value_int FROM profiles WHERE user_id = $1 AND idx = $2",
        )
        .bind(user_id)
        .bind(idx)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Store a preference, replacing any previous value for the same key.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        idx: &str,
        idx2: DbId,
        value: &ProfileValue,
    ) -> Result<(), sqlx::Error> {
        let (value_id, value_int, value_str) = match value {
            ProfileValue::Id(v) => (*v, 0, ""),
            ProfileValue::Int(v) => (0, *v, ""),
            ProfileValue::Str(v) => (0, 0, v.as_str()),
        };

        sqlx::query(
            "INSERT INTO profiles (user_id, idx, idx2, value_id, value_int, value_str, type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id, idx, idx2) DO UPDATE SET \
                 value_id = EXCLUDED.value_id, \
                 value_int = EXCLUDED.value_int, \
                 value_str = EXCLUDED.value_str, \
                 type = EXCLUDED.type",
        )
        .bind(user_id)
        .bind(idx)
        .bind(idx2)
        .bind(value_id)
        .bind(value_int)
        .bind(value_str)
        .bind(value.profile_type().id())
        .execute(pool)
        .await?;

        tracing::debug!(user_id, idx, idx2, "Profile value updated");
        Ok(())
    }
}
