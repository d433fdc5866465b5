//! Player routes: `/users/**`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::models::Player;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub username: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub new_level: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub user_id: String,
    pub username: String,
    pub level: i32,
    pub coins: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl From<Player> for PlayerResponse {
    fn from(p: Player) -> Self {
        Self {
            user_id: p.id,
            username: p.username,
            level: p.level,
            coins: p.coins,
            country: p.country,
        }
    }
}

/// POST /users
async fn create_player(
    state: web::Data<AppState>,
    body: web::Json<CreatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let player = state
        .players()
        .create_player(&body.username, body.country.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(PlayerResponse::from(player)))
}

/// GET /users/{user_id}
async fn get_player(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let player = state.players().get_player(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PlayerResponse::from(player)))
}

/// PUT /users/{user_id}/progress
async fn update_progress(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateProgressRequest>,
) -> Result<HttpResponse, AppError> {
    let player = state
        .players()
        .update_progress(&path.into_inner(), body.new_level)
        .await?;
    Ok(HttpResponse::Ok().json(PlayerResponse::from(player)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_player))
        .route("/{user_id}", web::get().to(get_player))
        .route("/{user_id}/progress", web::put().to(update_progress));
}
