use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::{
    game::{db as game_db, models::Game},
    server::error::ServerError,
    session::{
        db as session_db,
        models::{AppendOutcome, RecordedAnswer, Session, SessionKey},
    },
    store::{QuizStore, QuizTx},
    user::{
        db as user_db,
        models::{User, UserChat, UserSource},
    },
};

#[derive(Clone)]
pub struct PgQuizStore {
    pool: Pool<Postgres>,
}

impl PgQuizStore {
    pub async fn from_connection_string(connection_string: &str) -> Result<Self, ServerError> {
        let pool = Pool::<Postgres>::connect(connection_string).await?;
        Ok(Self { pool })
    }

    /// Loads every stored game once and logs its definition defects.
    pub async fn audit_games(&self) -> Result<(), ServerError> {
        let mut tx = self.pool.begin().await?;
        let games = game_db::tx_get_all_games(&mut tx).await?;
        tx.commit().await?;

        let defective = games.iter().filter(|game| game.log_defects() > 0).count();
        info!(
            "Audited {} games, {} with defects",
            games.len(),
            defective
        );
        Ok(())
    }

    pub async fn migrate(&self) -> Result<(), ServerError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn begin(&self) -> Result<Box<dyn QuizTx>, ServerError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgQuizTx { tx: Some(tx) }))
    }

    async fn ping(&self) -> Result<(), ServerError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgQuizTx {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgQuizTx {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, ServerError> {
        self.tx
            .as_mut()
            .ok_or_else(|| ServerError::Internal("Transaction is already finished".into()))
    }
}

#[async_trait]
impl QuizTx for PgQuizTx {
    async fn load_games(&mut self, ids: &[Uuid]) -> Result<Vec<Game>, ServerError> {
        game_db::tx_get_games_by_ids(self.tx()?, ids).await
    }

    async fn load_daily_game(&mut self) -> Result<Option<Game>, ServerError> {
        game_db::tx_get_daily_game(self.tx()?).await
    }

    async fn load_session(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
    ) -> Result<Session, ServerError> {
        let answers = session_db::tx_get_session_answers(self.tx()?, game_id, player_id).await?;
        Ok(Session::from_answers(
            SessionKey::new(game_id, player_id),
            answers,
        ))
    }

    async fn append_answer(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
        answer: &RecordedAnswer,
    ) -> Result<AppendOutcome, ServerError> {
        session_db::tx_insert_session_answer(self.tx()?, game_id, player_id, answer).await
    }

    async fn clear_session(&mut self, game_id: Uuid, player_id: Uuid) -> Result<(), ServerError> {
        session_db::tx_delete_session_answers(self.tx()?, game_id, player_id).await
    }

    async fn find_user_by_source(
        &mut self,
        external_id: &str,
        source: &str,
    ) -> Result<Option<User>, ServerError> {
        user_db::tx_get_user_by_source(self.tx()?, external_id, source).await
    }

    async fn insert_user_source(&mut self, source: &UserSource) -> Result<(), ServerError> {
        user_db::tx_insert_user_source(self.tx()?, source).await
    }

    async fn find_user_chat(
        &mut self,
        user_id: Uuid,
        chat_id: i64,
    ) -> Result<Option<UserChat>, ServerError> {
        user_db::tx_get_user_chat(self.tx()?, user_id, chat_id).await
    }

    async fn insert_user_chat(&mut self, chat: &UserChat) -> Result<(), ServerError> {
        user_db::tx_insert_user_chat(self.tx()?, chat).await
    }

    async fn commit(&mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}
