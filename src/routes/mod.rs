pub mod activity;
pub mod auth;
pub mod contracts;
pub mod health;
pub mod items;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(items::index)
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::profile)
        .service(auth::update_profile)
        .service(items::add_item)
        .service(items::delete_item)
        .service(items::search)
        .service(items::search_history)
        .service(contracts::create_contract)
        .service(contracts::list_contracts)
        .service(contracts::leave_feedback)
        .service(activity::list_favorites)
        .service(activity::add_favorite)
        .service(activity::remove_favorite)
        .service(activity::user_feedback);
}
