use std::{collections::HashMap, sync::Arc};

use crate::game::{
    error::GameError,
    models::{GameType, Question},
};

/// Judges a single submission against a question. Implementations are pure
/// and never persist anything.
pub trait Acceptor: Send + Sync {
    fn accept(&self, question: &Question, submitted: &[i64]) -> Result<bool, GameError>;
}

/// Single choice: exactly one option id, correct when it is flagged correct.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicAcceptor;

impl Acceptor for ClassicAcceptor {
    fn accept(&self, question: &Question, submitted: &[i64]) -> Result<bool, GameError> {
        let option_id = match submitted {
            [option_id] => *option_id,
            [] => {
                return Err(GameError::InvalidSubmission(
                    "an answer option is required".into(),
                ));
            }
            _ => {
                return Err(GameError::InvalidSubmission(
                    "simple choice can't have multiple answers".into(),
                ));
            }
        };

        if question.find_option(option_id).is_none() {
            return Err(GameError::UnknownAnswerOption {
                question_id: question.id,
                option_id,
            });
        }

        let is_correct = question.correct_option_ids().any(|id| id == option_id);
        Ok(is_correct)
    }
}

#[derive(Clone)]
pub struct AcceptorRegistry {
    acceptors: HashMap<GameType, Arc<dyn Acceptor>>,
}

impl AcceptorRegistry {
    pub fn empty() -> Self {
        Self {
            acceptors: HashMap::new(),
        }
    }

    /// Daily quizzes are judged like classic ones; they only differ in replayability.
    pub fn with_defaults() -> Self {
        let classic: Arc<dyn Acceptor> = Arc::new(ClassicAcceptor);
        Self::empty()
            .register(GameType::Classic, classic.clone())
            .register(GameType::Daily, classic)
    }

    pub fn register(mut self, game_type: GameType, acceptor: Arc<dyn Acceptor>) -> Self {
        self.acceptors.insert(game_type, acceptor);
        self
    }

    pub fn get(&self, game_type: &GameType) -> Result<&dyn Acceptor, GameError> {
        self.acceptors
            .get(game_type)
            .map(|acceptor| acceptor.as_ref())
            .ok_or_else(|| GameError::UnsupportedGameType(game_type.clone()))
    }
}

impl Default for AcceptorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
