use chrono::{DateTime, Utc};
use hoard_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account owner
///
/// The password hash is persisted with the record but redacted from
/// `Debug` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    /// Unique store-wide, compared case-sensitively as stored
    pub email: String,

    pub password_hash: Sensitive<String>,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh random id
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: Sensitive::new(password_hash.into()),
            created_at: Utc::now(),
        }
    }

    /// The id as used in store keys and repository calls
    pub fn user_id(&self) -> String {
        self.id.to_string()
    }
}
