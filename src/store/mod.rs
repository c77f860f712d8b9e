use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    game::models::Game,
    server::error::ServerError,
    session::models::{AppendOutcome, RecordedAnswer, Session},
    user::models::{User, UserChat, UserSource},
};

pub mod memory;
pub mod postgres;

/// Persistence boundary. Every read and write goes through a transaction.
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn QuizTx>, ServerError>;

    async fn ping(&self) -> Result<(), ServerError>;
}

#[async_trait]
pub trait QuizTx: Send {
    async fn load_games(&mut self, ids: &[Uuid]) -> Result<Vec<Game>, ServerError>;

    /// Oldest daily game that has not ended.
    async fn load_daily_game(&mut self) -> Result<Option<Game>, ServerError>;

    /// Empty session when the player has not answered anything yet.
    async fn load_session(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
    ) -> Result<Session, ServerError>;

    /// At most one answer per (game, player, question).
    async fn append_answer(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
        answer: &RecordedAnswer,
    ) -> Result<AppendOutcome, ServerError>;

    async fn clear_session(&mut self, game_id: Uuid, player_id: Uuid) -> Result<(), ServerError>;

    async fn find_user_by_source(
        &mut self,
        external_id: &str,
        source: &str,
    ) -> Result<Option<User>, ServerError>;

    async fn insert_user_source(&mut self, source: &UserSource) -> Result<(), ServerError>;

    async fn find_user_chat(
        &mut self,
        user_id: Uuid,
        chat_id: i64,
    ) -> Result<Option<UserChat>, ServerError>;

    async fn insert_user_chat(&mut self, chat: &UserChat) -> Result<(), ServerError>;

    async fn commit(&mut self) -> Result<(), ServerError>;

    async fn rollback(&mut self) -> Result<(), ServerError>;
}
