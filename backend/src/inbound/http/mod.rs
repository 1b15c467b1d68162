//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod auth;
pub mod boards;
pub mod cache_control;
pub mod cards;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler on `cfg`.
///
/// Literal segments (`rebalance`, `user`) are registered ahead of the
/// `{card_id}` and `{task_id}` matchers that would otherwise capture them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::sign_up)
        .service(auth::sign_in)
        .service(auth::sign_out)
        .service(auth::github_authorize)
        .service(auth::github_callback)
        .service(auth::github_exchange)
        .service(users::current_user)
        .service(boards::create_board)
        .service(boards::list_boards)
        .service(boards::get_board)
        .service(boards::update_board)
        .service(boards::delete_board)
        .service(boards::add_member)
        .service(cards::create_card)
        .service(cards::list_cards)
        .service(cards::rebalance_cards)
        .service(cards::list_cards_for_member)
        .service(cards::get_card)
        .service(cards::update_card)
        .service(cards::delete_card)
        .service(cards::move_card)
        .service(tasks::create_task)
        .service(tasks::list_tasks)
        .service(tasks::rebalance_tasks)
        .service(tasks::get_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(tasks::assign_task)
        .service(tasks::move_task);
}

/// Extractor configs rendering malformed bodies, paths and queries as error
/// envelopes.
pub fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler));
}
