use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    server::error::ServerError,
    user::models::{User, UserChat, UserSource},
};

pub async fn tx_get_user_by_source(
    tx: &mut Transaction<'_, Postgres>,
    external_id: &str,
    source: &str,
) -> Result<Option<User>, ServerError> {
    let user_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT user_id
        FROM "user_source"
        WHERE external_id = $1 AND source = $2
        "#,
    )
    .bind(external_id)
    .bind(source)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(user_id.map(|id| User { id }))
}

pub async fn tx_insert_user_source(
    tx: &mut Transaction<'_, Postgres>,
    source: &UserSource,
) -> Result<(), ServerError> {
    sqlx::query(
        r#"
        INSERT INTO "user_source" (user_id, external_id, source)
        VALUES ($1, $2, $3)
        ON CONFLICT (external_id, source) DO NOTHING
        "#,
    )
    .bind(source.user_id)
    .bind(&source.external_id)
    .bind(&source.source)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn tx_get_user_chat(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    chat_id: i64,
) -> Result<Option<UserChat>, ServerError> {
    let chat = sqlx::query_as::<_, UserChat>(
        r#"
        SELECT user_id, chat_id, chat_type
        FROM "user_chat"
        WHERE user_id = $1 AND chat_id = $2
        "#,
    )
    .bind(user_id)
    .bind(chat_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(chat)
}

pub async fn tx_insert_user_chat(
    tx: &mut Transaction<'_, Postgres>,
    chat: &UserChat,
) -> Result<(), ServerError> {
    sqlx::query(
        r#"
        INSERT INTO "user_chat" (user_id, chat_id, chat_type)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, chat_id) DO NOTHING
        "#,
    )
    .bind(chat.user_id)
    .bind(chat.chat_id)
    .bind(&chat.chat_type)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
