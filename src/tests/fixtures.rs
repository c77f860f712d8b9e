use std::sync::Arc;

use async_trait::async_trait;
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

use crate::{
    game::models::{AnswerOption, Game, GameType, Question, ScoreResult},
    server::{app_state::AppState, error::ServerError},
    session::models::{AppendOutcome, RecordedAnswer, Session, SessionKey},
    store::{QuizStore, QuizTx, memory::MemoryStore},
    user::models::{User, UserChat, UserSource},
};

pub fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn option(id: i64, is_correct: bool, score: Option<i64>) -> AnswerOption {
    AnswerOption {
        id,
        answer: format!("Option {}", id),
        is_correct,
        score,
    }
}

pub fn question(id: i64, options: Vec<AnswerOption>) -> Question {
    Question {
        id,
        text: format!("Question {}", id),
        image_id: None,
        explanation: Some(format!("Explanation {}", id)),
        answer_options: options,
    }
}

pub fn band(from: i64, to: i64, text: &str) -> ScoreResult {
    ScoreResult {
        from,
        to,
        text: text.to_string(),
    }
}

/// Q0: option 1 correct (1 point). Q1: option 0 correct (2 points).
/// Bands: 0-1 "Low", 2-3 "High".
pub fn two_question_game(game_type: GameType) -> Game {
    Game {
        id: Uuid::new_v4(),
        game_type,
        title: "Capitals".to_string(),
        description: Some("Two questions".to_string()),
        questions: vec![
            question(0, vec![option(0, false, None), option(1, true, Some(1))]),
            question(1, vec![option(0, true, Some(2)), option(1, false, None)]),
        ],
        score_results: vec![band(0, 1, "Low"), band(2, 3, "High")],
    }
}

/// `n` questions, four options each, option `i % 4` correct and worth 1.
pub fn generated_game(n: usize) -> Game {
    let questions = (0..n as i64)
        .map(|q| {
            question(
                q,
                (0..4).map(|o| option(o, o == q % 4, None)).collect(),
            )
        })
        .collect();

    Game {
        id: Uuid::new_v4(),
        game_type: GameType::Classic,
        title: "Generated".to_string(),
        description: None,
        questions,
        score_results: vec![band(0, n as i64, "Done")],
    }
}

pub fn answer(question_id: i64, answer_id: i64, is_correct: bool) -> RecordedAnswer {
    RecordedAnswer::new(question_id, answer_id, is_correct)
}

pub fn session(game: &Game, answers: Vec<RecordedAnswer>) -> Session {
    Session::from_answers(SessionKey::new(game.id, Uuid::nil()), answers)
}

pub fn memory_store(games: Vec<Game>) -> MemoryStore {
    let store = MemoryStore::new();
    for game in games {
        store.insert_game(game);
    }
    store
}

pub fn memory_state(store: &MemoryStore) -> Arc<AppState> {
    AppState::in_memory(store.clone())
}

/// Memory store with injectable faults.
/// `hide_first_session`: the first session read of each transaction sees no
/// answers, as if a concurrent writer committed between read and insert.
/// `fail_chat_insert`: inserting a chat link fails.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub hide_first_session: bool,
    pub fail_chat_insert: bool,
}

impl FaultyStore {
    pub fn new(inner: &MemoryStore) -> Self {
        Self {
            inner: inner.clone(),
            hide_first_session: false,
            fail_chat_insert: false,
        }
    }
}

pub struct FaultyTx {
    inner: Box<dyn QuizTx>,
    hide_session: bool,
    fail_chat_insert: bool,
}

#[async_trait]
impl QuizStore for FaultyStore {
    async fn begin(&self) -> Result<Box<dyn QuizTx>, ServerError> {
        Ok(Box::new(FaultyTx {
            inner: self.inner.begin().await?,
            hide_session: self.hide_first_session,
            fail_chat_insert: self.fail_chat_insert,
        }))
    }

    async fn ping(&self) -> Result<(), ServerError> {
        self.inner.ping().await
    }
}

#[async_trait]
impl QuizTx for FaultyTx {
    async fn load_games(&mut self, ids: &[Uuid]) -> Result<Vec<Game>, ServerError> {
        self.inner.load_games(ids).await
    }

    async fn load_daily_game(&mut self) -> Result<Option<Game>, ServerError> {
        self.inner.load_daily_game().await
    }

    async fn load_session(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
    ) -> Result<Session, ServerError> {
        if self.hide_session {
            self.hide_session = false;
            return Ok(Session::from_answers(
                SessionKey::new(game_id, player_id),
                vec![],
            ));
        }
        self.inner.load_session(game_id, player_id).await
    }

    async fn append_answer(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
        answer: &RecordedAnswer,
    ) -> Result<AppendOutcome, ServerError> {
        self.inner.append_answer(game_id, player_id, answer).await
    }

    async fn clear_session(&mut self, game_id: Uuid, player_id: Uuid) -> Result<(), ServerError> {
        self.inner.clear_session(game_id, player_id).await
    }

    async fn find_user_by_source(
        &mut self,
        external_id: &str,
        source: &str,
    ) -> Result<Option<User>, ServerError> {
        self.inner.find_user_by_source(external_id, source).await
    }

    async fn insert_user_source(&mut self, source: &UserSource) -> Result<(), ServerError> {
        self.inner.insert_user_source(source).await
    }

    async fn find_user_chat(
        &mut self,
        user_id: Uuid,
        chat_id: i64,
    ) -> Result<Option<UserChat>, ServerError> {
        self.inner.find_user_chat(user_id, chat_id).await
    }

    async fn insert_user_chat(&mut self, chat: &UserChat) -> Result<(), ServerError> {
        if self.fail_chat_insert {
            return Err(ServerError::Internal("chat insert failed".into()));
        }
        self.inner.insert_user_chat(chat).await
    }

    async fn commit(&mut self) -> Result<(), ServerError> {
        self.inner.commit().await
    }

    async fn rollback(&mut self) -> Result<(), ServerError> {
        self.inner.rollback().await
    }
}
