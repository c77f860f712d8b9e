use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub game_id: Uuid,
    pub player_id: Uuid,
}

impl SessionKey {
    pub fn new(game_id: Uuid, player_id: Uuid) -> Self {
        Self { game_id, player_id }
    }
}

/// A judged answer. The verdict is fixed at answer time and never recomputed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct RecordedAnswer {
    pub question_id: i64,
    pub answer_id: i64,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl RecordedAnswer {
    pub fn new(question_id: i64, answer_id: i64, is_correct: bool) -> Self {
        Self {
            question_id,
            answer_id,
            is_correct,
            answered_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub key: SessionKey,
    pub answers: Vec<RecordedAnswer>,
}

impl Session {
    pub fn from_answers(key: SessionKey, answers: Vec<RecordedAnswer>) -> Self {
        Self { key, answers }
    }

    /// First recorded answer for the question. Later duplicates are ignored.
    pub fn answer_for(&self, question_id: i64) -> Option<&RecordedAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    /// Another answer for the same question already exists; nothing was written.
    AlreadyAnswered,
}
