//! Tournament routes: `/tournaments/**`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::services::tournament_flow::{Admission, ClaimOutcome};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterRequest {
    pub user_id: String,
    pub tournament_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub user_id: String,
    pub increment: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    message: &'static str,
    tournament_id: String,
    #[serde(with = "time::serde::rfc3339")]
    start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end_time: OffsetDateTime,
    active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndResponse {
    message: &'static str,
    tournament_id: String,
    active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnterResponse {
    message: &'static str,
    user_id: String,
    tournament_id: String,
    group_id: String,
    remaining_coins: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    message: &'static str,
    tournament_id: String,
    user_id: String,
    new_score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimResponse {
    message: &'static str,
    user_id: String,
    tournament_id: String,
    rank: Option<u32>,
    reward: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankResponse {
    tournament_id: String,
    user_id: String,
    rank: u32,
}

/// POST /tournaments/start
async fn start_tournament(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let t = state.tournament_flow().start_tournament().await?;
    Ok(HttpResponse::Ok().json(StartResponse {
        message: "Tournament started",
        tournament_id: t.id,
        start_time: t.starts_at,
        end_time: t.ends_at,
        active: t.active,
    }))
}

/// PUT /tournaments/end/{tournament_id}
async fn end_tournament(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let t = state
        .tournament_flow()
        .end_tournament(&path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(EndResponse {
        message: "Tournament ended",
        tournament_id: t.id,
        active: t.active,
    }))
}

/// POST /tournaments/enter
///
/// Retries a lost group-counter race up to `entry_race_retries` times;
/// every other failure is returned as is.
async fn enter_tournament(
    state: web::Data<AppState>,
    body: web::Json<EnterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let flow = state.tournament_flow();

    let mut retries = 0;
    let admission: Admission = loop {
        match flow
            .enter_tournament(&body.user_id, &body.tournament_id)
            .await
        {
            Ok(admission) => break admission,
            Err(DomainError::Conflict(ConflictKind::OptimisticLock, _))
                if retries < state.entry_race_retries =>
            {
                retries += 1;
                debug!(
                    user_id = %body.user_id,
                    tournament_id = %body.tournament_id,
                    retries,
                    "Retrying entry after lost group race"
                );
            }
            Err(e) => return Err(e.into()),
        }
    };

    Ok(HttpResponse::Ok().json(EnterResponse {
        message: "User entered tournament successfully",
        user_id: body.user_id,
        tournament_id: body.tournament_id,
        group_id: admission.entry.group_id,
        remaining_coins: admission.remaining_coins,
    }))
}

/// PUT /tournaments/{tournament_id}/score
async fn update_score(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ScoreRequest>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = path.into_inner();
    let body = body.into_inner();
    let new_score = state
        .tournament_flow()
        .update_score(&tournament_id, &body.user_id, body.increment)
        .await?;
    Ok(HttpResponse::Ok().json(ScoreResponse {
        message: "Score updated successfully",
        tournament_id,
        user_id: body.user_id,
        new_score,
    }))
}

/// POST /tournaments/{tournament_id}/claim
///
/// Zero-payout outcomes are 200 with `reward: 0`.
async fn claim_reward(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ClaimRequest>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = path.into_inner();
    let body = body.into_inner();
    let outcome = state
        .tournament_flow()
        .claim_reward(&tournament_id, &body.user_id)
        .await?;

    let (message, balance) = match outcome {
        ClaimOutcome::Rewarded { balance, .. } => ("Reward claimed successfully", Some(balance)),
        ClaimOutcome::NoRewardForRank { .. } => {
            ("No reward available for your rank in the group", None)
        }
        ClaimOutcome::Unranked => ("No rank could be determined in the group", None),
    };

    Ok(HttpResponse::Ok().json(ClaimResponse {
        message,
        user_id: body.user_id,
        tournament_id,
        rank: outcome.rank(),
        reward: outcome.reward(),
        balance,
    }))
}

/// GET /tournaments/{tournament_id}/rank?userId=
async fn get_rank(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RankQuery>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = path.into_inner();
    let user_id = query.into_inner().user_id;
    let rank = state
        .tournament_flow()
        .resolve_rank(&tournament_id, &user_id)
        .await?;
    Ok(HttpResponse::Ok().json(RankResponse {
        tournament_id,
        user_id,
        rank,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/start", web::post().to(start_tournament))
        .route("/end/{tournament_id}", web::put().to(end_tournament))
        .route("/enter", web::post().to(enter_tournament))
        .route("/{tournament_id}/score", web::put().to(update_score))
        .route("/{tournament_id}/claim", web::post().to(claim_reward))
        .route("/{tournament_id}/rank", web::get().to(get_rank));
}
