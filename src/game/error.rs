use thiserror::Error;
use uuid::Uuid;

use crate::game::models::GameType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    /// The stored game definition or session is inconsistent. A content bug,
    /// not a client error.
    DataIntegrity,
}

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("Game with id {0} was not found")]
    GameNotFound(Uuid),

    #[error("There is no active daily game")]
    DailyGameNotFound,

    #[error("Question with id {0} was not found")]
    QuestionNotFound(i64),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Answer option {option_id} does not belong to question {question_id}")]
    UnknownAnswerOption { question_id: i64, option_id: i64 },

    #[error("Session references question {0} which is not part of the game")]
    InvalidQuestionId(i64),

    #[error("Session references answer option {option_id} missing from question {question_id}")]
    AnswerOptionNotFound { question_id: i64, option_id: i64 },

    #[error("No result band covers total score {0}")]
    NoResultForScore(i64),

    #[error("Total score overflows adding {points} points for question {question_id}")]
    ScoreOverflow { question_id: i64, points: i64 },

    #[error("Game type '{0}' is not supported")]
    UnsupportedGameType(GameType),

    #[error("Invalid game payload: {0}")]
    InvalidPayload(String),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::GameNotFound(_)
            | GameError::DailyGameNotFound
            | GameError::QuestionNotFound(_) => ErrorKind::NotFound,
            GameError::InvalidSubmission(_) | GameError::UnknownAnswerOption { .. } => {
                ErrorKind::InvalidInput
            }
            GameError::InvalidQuestionId(_)
            | GameError::AnswerOptionNotFound { .. }
            | GameError::NoResultForScore(_)
            | GameError::ScoreOverflow { .. }
            | GameError::UnsupportedGameType(_)
            | GameError::InvalidPayload(_) => ErrorKind::DataIntegrity,
        }
    }
}
