use sqlx::{Postgres, Transaction, types::Json};
use uuid::Uuid;

use crate::{
    game::{
        models::{Game, GameType},
        payload::GamePayload,
    },
    server::error::ServerError,
};

#[derive(Debug, sqlx::FromRow)]
pub struct GameRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub game_type: String,
    pub payload: Json<GamePayload>,
}

impl GameRow {
    pub fn into_game(self) -> Result<Game, ServerError> {
        let game = self
            .payload
            .0
            .into_game(self.id, Some(GameType::from(self.game_type)))?;

        Ok(game)
    }
}

pub async fn tx_get_games_by_ids(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> Result<Vec<Game>, ServerError> {
    let rows = sqlx::query_as::<_, GameRow>(
        r#"
        SELECT id, type, payload
        FROM "quiz_game"
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(&mut **tx)
    .await?;

    rows.into_iter().map(GameRow::into_game).collect()
}

pub async fn tx_get_daily_game(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Option<Game>, ServerError> {
    let row = sqlx::query_as::<_, GameRow>(
        r#"
        SELECT g.id, g.type, g.payload
        FROM "quiz_game" g
        INNER JOIN "game_daily" gd ON g.id = gd.game_id
        WHERE gd.ended_at IS NULL
        ORDER BY gd.created_at ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(&mut **tx)
    .await?;

    row.map(GameRow::into_game).transpose()
}

pub async fn tx_get_all_games(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<Game>, ServerError> {
    let rows = sqlx::query_as::<_, GameRow>(
        r#"
        SELECT id, type, payload
        FROM "quiz_game"
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;

    rows.into_iter().map(GameRow::into_game).collect()
}
