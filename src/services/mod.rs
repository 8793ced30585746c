//! Operations behind the HTTP handlers.
//!
//! Every function takes the pool (and the job queue where it notifies) plus,
//! for caller-scoped operations, the `AuthenticatedUser` resolved for the
//! request. Handlers stay thin wrappers that turn results into responses.

pub mod activity;
pub mod contracts;
pub mod items;
pub mod users;
