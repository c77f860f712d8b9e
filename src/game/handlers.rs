use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    game::{
        models::{
            AcceptAnswerRequest, AcceptAnswerResponse, DailyGameResponse, ResetResponse,
            StateResponse,
        },
        service::{self, AcceptAnswerInput},
    },
    mw::player_mw::player_mw,
    server::{app_state::AppState, error::ServerError},
    user::models::PlayerId,
};

pub fn game_routes(state: Arc<AppState>) -> Router {
    let player_routes = Router::new()
        .route("/{game_id}", get(get_current_state))
        .route("/{game_id}/accept-answer", post(accept_answer))
        .route("/{game_id}/reset", get(reset_game))
        .layer(from_fn_with_state(state.clone(), player_mw))
        .with_state(state.clone());

    Router::new()
        .route("/daily", get(get_daily_game))
        .with_state(state)
        .merge(player_routes)
}

async fn get_current_state(
    State(state): State<Arc<AppState>>,
    Extension(PlayerId(player_id)): Extension<PlayerId>,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let game_state = service::get_current_state(state.get_store(), game_id, player_id).await?;
    Ok((StatusCode::OK, Json(StateResponse::from(&game_state))))
}

async fn accept_answer(
    State(state): State<Arc<AppState>>,
    Extension(PlayerId(player_id)): Extension<PlayerId>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<AcceptAnswerRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let input = AcceptAnswerInput {
        game_id,
        player_id,
        question_id: request.question_id,
        answer_id: request.answer_id,
    };

    let verdict = service::accept_answer(state.get_store(), state.get_acceptors(), input).await?;
    Ok((StatusCode::OK, Json(AcceptAnswerResponse::from(verdict))))
}

async fn reset_game(
    State(state): State<Arc<AppState>>,
    Extension(PlayerId(player_id)): Extension<PlayerId>,
    Path(game_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    service::reset(state.get_store(), game_id, player_id).await?;
    Ok((StatusCode::OK, Json(ResetResponse { success: true })))
}

async fn get_daily_game(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let game = service::get_daily_game(state.get_store()).await?;
    Ok((StatusCode::OK, Json(DailyGameResponse { game_id: game.id })))
}
