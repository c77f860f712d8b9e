use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    server::{app_state::AppState, error::ServerError},
    user::{
        models::{PlayerId, UserData},
        service::retrieve_user,
    },
};

pub static PLAYER_ID_HEADER: &str = "X-Player-ID";
pub static SOURCE_HEADER: &str = "X-Source";
pub static CHAT_ID_HEADER: &str = "X-Chat-ID";
pub static CHAT_TYPE_HEADER: &str = "X-Chat-Type";

/// Resolves the player behind a request. With an `X-Source` header the player
/// header is an outside identity mapped to an internal user; without one it
/// must already be a uuid.
pub async fn player_mw(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(player_header) = extract_header(PLAYER_ID_HEADER, req.headers()) else {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            format!("header {} is required", PLAYER_ID_HEADER),
        ));
    };

    let player_id = match extract_header(SOURCE_HEADER, req.headers()) {
        Some(source) => {
            let data = user_data(player_header, source, req.headers())?;
            retrieve_user(state.get_store(), data).await?.id
        }
        None => to_uuid(&player_header)?,
    };

    debug!("Request by player: {}", player_id);
    req.extensions_mut().insert(PlayerId(player_id));

    Ok(next.run(req).await)
}

fn user_data(
    external_id: String,
    source: String,
    headers: &HeaderMap,
) -> Result<UserData, ServerError> {
    let chat_id = match extract_header(CHAT_ID_HEADER, headers) {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            ServerError::Api(
                StatusCode::BAD_REQUEST,
                format!("header {} must be an integer", CHAT_ID_HEADER),
            )
        })?),
        None => None,
    };

    let chat_type = chat_id.map(|_| extract_header(CHAT_TYPE_HEADER, headers).unwrap_or_default());

    Ok(UserData {
        external_id,
        source,
        chat_id,
        chat_type,
    })
}

fn to_uuid(value: &str) -> Result<Uuid, ServerError> {
    value.parse().map_err(|_| {
        ServerError::Api(
            StatusCode::BAD_REQUEST,
            "invalid player_id format".into(),
        )
    })
}

fn extract_header(key: &str, header_map: &HeaderMap) -> Option<String> {
    header_map
        .get(key)
        .and_then(|header| header.to_str().ok())
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
