//! Leaderboard routes: `/leaderboard/**`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::models::{Entry, Player};
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    pub country: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupQuery {
    pub group_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRow {
    rank: usize,
    user_id: String,
    username: String,
    level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRow {
    rank: usize,
    user_id: String,
    score: i64,
    group_id: String,
}

fn player_rows(players: Vec<Player>) -> Vec<PlayerRow> {
    players
        .into_iter()
        .enumerate()
        .map(|(i, p)| PlayerRow {
            rank: i + 1,
            user_id: p.id,
            username: p.username,
            level: p.level,
            country: p.country,
        })
        .collect()
}

fn entry_rows(entries: Vec<Entry>) -> Vec<EntryRow> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| EntryRow {
            rank: i + 1,
            user_id: e.user_id,
            score: e.score,
            group_id: e.group_id,
        })
        .collect()
}

/// GET /leaderboard/global
async fn global(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let players = state.leaderboards().global_leaderboard().await?;
    Ok(HttpResponse::Ok().json(player_rows(players)))
}

/// GET /leaderboard/country?country=
async fn country(
    state: web::Data<AppState>,
    query: web::Query<CountryQuery>,
) -> Result<HttpResponse, AppError> {
    let players = state
        .leaderboards()
        .country_leaderboard(&query.country)
        .await?;
    Ok(HttpResponse::Ok().json(player_rows(players)))
}

/// GET /leaderboard/tournament?groupId=
async fn group(
    state: web::Data<AppState>,
    query: web::Query<GroupQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = state
        .leaderboards()
        .group_leaderboard(&query.group_id)
        .await?;
    Ok(HttpResponse::Ok().json(entry_rows(entries)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/global", web::get().to(global))
        .route("/country", web::get().to(country))
        .route("/tournament", web::get().to(group));
}
