use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Availability of an item. Stored as lowercase text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Can be rented.
    #[default]
    Available,
    /// Withdrawn by the owner.
    Unavailable,
}

/// Input structure for listing a new item.
///
/// The name is trimmed before use; an empty name after trimming is rejected.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ItemInput {
    #[validate(length(max = 50))]
    pub name: String,

    #[validate(length(max = 250))]
    pub description: Option<String>,

    #[validate(length(max = 150))]
    pub photo: Option<String>,

    #[validate(range(min = 0.0))]
    pub price_hour: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_day: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_week: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_month: Option<f64>,
}

/// An item offered for rent, as stored in the `items` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub price_hour: Option<f64>,
    pub price_day: Option<f64>,
    pub price_week: Option<f64>,
    pub price_month: Option<f64>,
    /// Identifier of the user renting the item out.
    pub owner_id: i64,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

/// Query parameters of the item search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}
