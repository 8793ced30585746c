#![doc = "The `rentdesk` library crate."]
#![doc = ""]
#![doc = "Item-rental bookkeeping: users list items, form rental contracts and get an"]
#![doc = "email for each contract. Request handlers queue the email as a job; the"]
#![doc = "notification worker (`worker`) delivers it outside the request cycle."]
#![doc = "Both binaries (`rentdesk` and `rentdesk-worker`) are built from this crate."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod queue;
pub mod routes;
pub mod services;
pub mod state;
pub mod worker;

pub use crate::error::AppError;
pub use crate::state::AppState;
