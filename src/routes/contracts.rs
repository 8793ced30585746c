use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ContractInput, ContractQuery, FeedbackInput},
    services::{activity, contracts},
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Creates a contract for renting an item and queues the notification email.
///
/// The body is optional; it may carry `text` and `end_date`.
///
/// ## Responses:
/// - `201 Created`: the new `Contract`.
/// - `400 Bad Request`: a body was sent but is not valid contract terms.
/// - `404 Not Found`: no such item (nothing is queued).
/// - `422 Unprocessable Entity`: the end date is not in the future.
/// - `503 Service Unavailable`: the job broker rejected the email job; no contract is kept.
#[post("/create_contract/{id}")]
pub async fn create_contract(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    item_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let input = parse_terms(&body)?;
    let contract = contracts::create_contract(
        &state.pool,
        state.queue.as_ref(),
        &caller,
        item_id.into_inner(),
        input,
    )
    .await?;
    Ok(HttpResponse::Created().json(contract))
}

/// Reads the optional contract terms. No body, or only whitespace, means no
/// terms; anything else must parse.
fn parse_terms(body: &[u8]) -> Result<ContractInput, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContractInput::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid contract terms: {}", e)))
}

/// Lists the caller's contracts.
///
/// ## Query Parameters:
/// - `role` (optional): `taker` (default) or `leaser`.
#[get("/contracts")]
pub async fn list_contracts(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    query: web::Query<ContractQuery>,
) -> Result<impl Responder, AppError> {
    let role = query.role.unwrap_or_default();
    let contracts = contracts::list_contracts(&state.pool, &caller, role).await?;
    Ok(HttpResponse::Ok().json(contracts))
}

#[post("/contracts/{id}/feedback")]
pub async fn leave_feedback(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    contract_id: web::Path<i64>,
    feedback: web::Json<FeedbackInput>,
) -> Result<impl Responder, AppError> {
    let feedback = activity::leave_feedback(
        &state.pool,
        &caller,
        contract_id.into_inner(),
        feedback.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(feedback))
}
