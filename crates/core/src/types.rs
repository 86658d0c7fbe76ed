/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Id value meaning "nothing selected" or "not yet saved".
pub const UNSET_ID: DbId = 0;
