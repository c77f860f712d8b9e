use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct User {
    pub id: Uuid,
}

impl User {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

/// Links an identity from an outside platform to an internal user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserSource {
    pub user_id: Uuid,
    pub external_id: String,
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserChat {
    pub user_id: Uuid,
    pub chat_id: i64,
    pub chat_type: String,
}

#[derive(Debug, Clone)]
pub struct UserData {
    pub external_id: String,
    pub source: String,
    pub chat_id: Option<i64>,
    pub chat_type: Option<String>,
}

/// Resolved player identity, inserted into request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerId(pub Uuid);
