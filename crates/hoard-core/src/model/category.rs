use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined grouping for contracts or purchases
///
/// Categories are scoped by (user, module); the id is unique only within
/// that scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,

    /// Translation key for built-in categories (e.g. `categoryNames.insurance`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_key: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            name_key: None,
            created_at: now,
            updated_at: now,
        }
    }
}
