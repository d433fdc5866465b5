use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod health;
pub mod leaderboards;
pub mod players;
pub mod tournaments;

/// Register every route, plus extractor configs that render malformed
/// bodies and query strings as problem details.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));

    cfg.configure(health::configure_routes);
    cfg.service(web::scope("/users").configure(players::configure_routes));
    cfg.service(web::scope("/tournaments").configure(tournaments::configure_routes));
    cfg.service(web::scope("/leaderboard").configure(leaderboards::configure_routes));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request(ErrorCode::BadRequest, format!("Invalid JSON body: {err}")).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request(
        ErrorCode::InvalidParameter,
        format!("Invalid query string: {err}"),
    )
    .into()
}
