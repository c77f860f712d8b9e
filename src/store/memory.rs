use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::{
    game::{models::Game, payload::GamePayload},
    server::error::ServerError,
    session::models::{AppendOutcome, RecordedAnswer, Session, SessionKey},
    store::{QuizStore, QuizTx},
    user::models::{User, UserChat, UserSource},
};

#[derive(Default)]
struct MemoryData {
    games: DashMap<Uuid, Game>,
    daily: RwLock<Vec<Uuid>>,
    sessions: DashMap<SessionKey, Vec<RecordedAnswer>>,
    user_sources: DashMap<(String, String), UserSource>,
    user_chats: DashMap<(Uuid, i64), UserChat>,
}

/// Process-local store. Transactions are fully serialised and buffer their
/// writes until commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<MemoryData>,
    lock: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_game(&self, game: Game) {
        self.data.games.insert(game.id, game);
    }

    /// Queues a game as daily. The first queued game is the active one.
    pub async fn push_daily(&self, game_id: Uuid) {
        self.data.daily.write().await.push(game_id);
    }

    pub async fn end_daily(&self, game_id: Uuid) {
        self.data.daily.write().await.retain(|id| *id != game_id);
    }

    /// Seeds games from `*.json` payload files. The file stem is the game id
    /// when it parses as a uuid, otherwise a fresh id is assigned.
    pub async fn seed_from_dir(&self, dir: &Path) -> Result<usize, ServerError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to read seed dir: {}", e)))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to read seed dir: {}", e)))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ServerError::Internal(format!("Failed to read {:?}: {}", path, e)))?;

            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<Uuid>().ok())
                .unwrap_or_else(Uuid::new_v4);

            let game = GamePayload::from_slice(&bytes)?.into_game(id, None)?;
            game.log_defects();

            if !game.game_type.is_replayable() {
                self.push_daily(id).await;
            }

            info!("Seeded game {} ({}) from {:?}", id, game.title, path);
            self.insert_game(game);
        }

        Ok(paths.len())
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn QuizTx>, ServerError> {
        let guard = self.lock.clone().lock_owned().await;
        Ok(Box::new(MemoryTx {
            data: self.data.clone(),
            _guard: guard,
            pending: Vec::new(),
        }))
    }

    async fn ping(&self) -> Result<(), ServerError> {
        Ok(())
    }
}

enum Write {
    Append(SessionKey, RecordedAnswer),
    Clear(SessionKey),
    Source(UserSource),
    Chat(UserChat),
}

pub struct MemoryTx {
    data: Arc<MemoryData>,
    _guard: OwnedMutexGuard<()>,
    pending: Vec<Write>,
}

impl MemoryTx {
    fn session_view(&self, key: &SessionKey) -> Vec<RecordedAnswer> {
        let mut answers = self
            .data
            .sessions
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        for write in &self.pending {
            match write {
                Write::Append(k, answer) if k == key => answers.push(answer.clone()),
                Write::Clear(k) if k == key => answers.clear(),
                _ => {}
            }
        }

        answers
    }
}

#[async_trait]
impl QuizTx for MemoryTx {
    async fn load_games(&mut self, ids: &[Uuid]) -> Result<Vec<Game>, ServerError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.data.games.get(id).map(|g| g.value().clone()))
            .collect())
    }

    async fn load_daily_game(&mut self) -> Result<Option<Game>, ServerError> {
        let daily = self.data.daily.read().await;
        Ok(daily
            .iter()
            .find_map(|id| self.data.games.get(id).map(|g| g.value().clone())))
    }

    async fn load_session(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
    ) -> Result<Session, ServerError> {
        let key = SessionKey::new(game_id, player_id);
        let answers = self.session_view(&key);
        Ok(Session::from_answers(key, answers))
    }

    async fn append_answer(
        &mut self,
        game_id: Uuid,
        player_id: Uuid,
        answer: &RecordedAnswer,
    ) -> Result<AppendOutcome, ServerError> {
        let key = SessionKey::new(game_id, player_id);
        let exists = self
            .session_view(&key)
            .iter()
            .any(|a| a.question_id == answer.question_id);

        if exists {
            return Ok(AppendOutcome::AlreadyAnswered);
        }

        self.pending.push(Write::Append(key, answer.clone()));
        Ok(AppendOutcome::Inserted)
    }

    async fn clear_session(&mut self, game_id: Uuid, player_id: Uuid) -> Result<(), ServerError> {
        self.pending
            .push(Write::Clear(SessionKey::new(game_id, player_id)));
        Ok(())
    }

    async fn find_user_by_source(
        &mut self,
        external_id: &str,
        source: &str,
    ) -> Result<Option<User>, ServerError> {
        let pending = self.pending.iter().find_map(|write| match write {
            Write::Source(s) if s.external_id == external_id && s.source == source => {
                Some(User { id: s.user_id })
            }
            _ => None,
        });

        if pending.is_some() {
            return Ok(pending);
        }

        Ok(self
            .data
            .user_sources
            .get(&(external_id.to_string(), source.to_string()))
            .map(|s| User { id: s.user_id }))
    }

    async fn insert_user_source(&mut self, source: &UserSource) -> Result<(), ServerError> {
        self.pending.push(Write::Source(source.clone()));
        Ok(())
    }

    async fn find_user_chat(
        &mut self,
        user_id: Uuid,
        chat_id: i64,
    ) -> Result<Option<UserChat>, ServerError> {
        let pending = self.pending.iter().find_map(|write| match write {
            Write::Chat(c) if c.user_id == user_id && c.chat_id == chat_id => Some(c.clone()),
            _ => None,
        });

        if pending.is_some() {
            return Ok(pending);
        }

        Ok(self
            .data
            .user_chats
            .get(&(user_id, chat_id))
            .map(|c| c.value().clone()))
    }

    async fn insert_user_chat(&mut self, chat: &UserChat) -> Result<(), ServerError> {
        self.pending.push(Write::Chat(chat.clone()));
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), ServerError> {
        for write in self.pending.drain(..) {
            match write {
                Write::Append(key, answer) => {
                    self.data.sessions.entry(key).or_default().push(answer);
                }
                Write::Clear(key) => {
                    self.data.sessions.remove(&key);
                }
                Write::Source(source) => {
                    self.data
                        .user_sources
                        .entry((source.external_id.clone(), source.source.clone()))
                        .or_insert(source);
                }
                Write::Chat(chat) => {
                    self.data
                        .user_chats
                        .entry((chat.user_id, chat.chat_id))
                        .or_insert(chat);
                }
            }
        }

        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), ServerError> {
        self.pending.clear();
        Ok(())
    }
}
