use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Item;

/// A registered user as stored in the `users` table.
///
/// The password hash is loaded for verification but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// National identification number.
    pub ipn: Option<String>,
    pub full_name: Option<String>,
    pub contacts: Option<String>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields. Absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 20))]
    pub ipn: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub full_name: Option<String>,
    #[validate(length(max = 150))]
    pub contacts: Option<String>,
    #[validate(length(max = 150))]
    pub photo: Option<String>,
}

/// Response body of the profile endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Profile {
    pub user: User,
    pub items: Vec<Item>,
}
