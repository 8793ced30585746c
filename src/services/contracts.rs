use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Contract, ContractInput, ContractRole, ContractStatus};
use crate::queue::{EmailJob, JobQueue};
use crate::services::items::find_item;

const CONTRACT_COLUMNS: &str =
    "id, contract_num, text, start_date, end_date, status, leaser_id, taker_id, item_id";

/// Body of every contract notification email.
pub const CONTRACT_EMAIL_BODY: &str = "Your contract body text here";

pub fn contract_email_subject(item_name: &str) -> String {
    format!("Contract for {}", item_name)
}

/// Opens a pending contract for the caller to rent `item_id` from its owner
/// and queues the notification email.
///
/// The row is written in a transaction that only commits once the broker has
/// accepted the job, so a contract is never recorded without its email being
/// queued. An unknown item queues nothing.
pub async fn create_contract(
    pool: &SqlitePool,
    queue: &dyn JobQueue,
    caller: &AuthenticatedUser,
    item_id: i64,
    input: ContractInput,
) -> Result<Contract, AppError> {
    let item = find_item(pool, item_id).await?;
    if item.owner_id == caller.id {
        log::warn!(
            "user {} is contracting their own item {}",
            caller.username,
            item.id
        );
    }
    input.validate()?;

    let start_date = Utc::now();
    if let Some(end_date) = input.end_date {
        if end_date <= start_date {
            return Err(AppError::ValidationError(
                "Contract end date must be in the future".into(),
            ));
        }
    }

    let mut tx = pool.begin().await?;
    let contract = sqlx::query_as::<_, Contract>(&format!(
        "INSERT INTO contracts (contract_num, text, start_date, end_date, status, leaser_id, taker_id, item_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {CONTRACT_COLUMNS}"
    ))
    .bind(Contract::generate_number())
    .bind(&input.text)
    .bind(start_date)
    .bind(input.end_date)
    .bind(ContractStatus::Pending)
    .bind(item.owner_id)
    .bind(caller.id)
    .bind(item.id)
    .fetch_one(&mut *tx)
    .await?;

    let job = EmailJob::new(
        caller.username.as_str(),
        contract_email_subject(&item.name),
        CONTRACT_EMAIL_BODY,
    );
    queue.enqueue(&job).await?;
    if let Err(e) = tx.commit().await {
        // The job is already with the broker and cannot be recalled.
        log::error!(
            "contract for item {} not saved but email job {} was queued: {}",
            item.id,
            job.id,
            e
        );
        return Err(e.into());
    }

    log::info!(
        "contract {} created for item {} (taker {}), email job {} queued",
        contract.contract_num,
        item.id,
        caller.username,
        job.id
    );
    Ok(contract)
}

/// Contracts the caller takes part in on the given side.
pub async fn list_contracts(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    role: ContractRole,
) -> Result<Vec<Contract>, AppError> {
    let column = match role {
        ContractRole::Taker => "taker_id",
        ContractRole::Leaser => "leaser_id",
    };
    let contracts = sqlx::query_as::<_, Contract>(&format!(
        "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE {column} = $1 ORDER BY id"
    ))
    .bind(caller.id)
    .fetch_all(pool)
    .await?;
    Ok(contracts)
}

pub async fn find_contract(pool: &SqlitePool, contract_id: i64) -> Result<Contract, AppError> {
    sqlx::query_as::<_, Contract>(&format!(
        "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = $1"
    ))
    .bind(contract_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Contract not found".into()))
}
