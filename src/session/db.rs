use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    server::error::ServerError,
    session::models::{AppendOutcome, RecordedAnswer},
};

pub async fn tx_get_session_answers(
    tx: &mut Transaction<'_, Postgres>,
    game_id: Uuid,
    player_id: Uuid,
) -> Result<Vec<RecordedAnswer>, ServerError> {
    let answers = sqlx::query_as::<_, RecordedAnswer>(
        r#"
        SELECT question_id, answer_id, is_correct, answered_at
        FROM "game_session_answer"
        WHERE game_id = $1 AND player_id = $2
        ORDER BY answered_at ASC, question_id ASC
        "#,
    )
    .bind(game_id)
    .bind(player_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(answers)
}

/// Relies on the unique (game_id, player_id, question_id) index: a second
/// answer to the same question inserts nothing.
pub async fn tx_insert_session_answer(
    tx: &mut Transaction<'_, Postgres>,
    game_id: Uuid,
    player_id: Uuid,
    answer: &RecordedAnswer,
) -> Result<AppendOutcome, ServerError> {
    let row = sqlx::query(
        r#"
        INSERT INTO "game_session_answer" (game_id, player_id, question_id, answer_id, is_correct, answered_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (game_id, player_id, question_id) DO NOTHING
        "#,
    )
    .bind(game_id)
    .bind(player_id)
    .bind(answer.question_id)
    .bind(answer.answer_id)
    .bind(answer.is_correct)
    .bind(answer.answered_at)
    .execute(&mut **tx)
    .await?;

    if row.rows_affected() == 0 {
        return Ok(AppendOutcome::AlreadyAnswered);
    }

    Ok(AppendOutcome::Inserted)
}

pub async fn tx_delete_session_answers(
    tx: &mut Transaction<'_, Postgres>,
    game_id: Uuid,
    player_id: Uuid,
) -> Result<(), ServerError> {
    sqlx::query(
        r#"
        DELETE FROM "game_session_answer"
        WHERE game_id = $1 AND player_id = $2
        "#,
    )
    .bind(game_id)
    .bind(player_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
