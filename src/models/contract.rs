use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a rental contract. Stored as lowercase text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

/// Which side of a contract the caller is on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContractRole {
    /// The user renting an item from its owner.
    #[default]
    Taker,
    /// The item's owner.
    Leaser,
}

/// A rental contract, as stored in the `contracts` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: i64,
    pub contract_num: String,
    pub text: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: ContractStatus,
    pub leaser_id: i64,
    pub taker_id: i64,
    pub item_id: i64,
}

/// Optional body of the create-contract endpoint.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ContractInput {
    #[validate(length(max = 5000))]
    pub text: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractQuery {
    pub role: Option<ContractRole>,
}

impl Contract {
    /// Generates a fresh contract number of the form `RC-<32 hex digits>`.
    pub fn generate_number() -> String {
        format!("RC-{}", Uuid::new_v4().simple())
    }
}
