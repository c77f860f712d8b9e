use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{
    error::GameError,
    models::{AnswerOption, Game, GameType, Question, ScoreResult},
};

/// Stored game document. Question and option ids are their positions.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GamePayload {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub questions: Vec<PayloadQuestion>,
    /// `"<from>-<to>"` to result text, kept in declared order.
    #[serde(default)]
    pub result: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PayloadQuestion {
    pub question: String,
    pub image: Option<String>,
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<PayloadOption>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayloadOption {
    pub text: String,
    pub score: Option<i64>,
    #[serde(default)]
    pub is_correct: bool,
}

impl GamePayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, GameError> {
        serde_json::from_slice(bytes).map_err(|e| GameError::InvalidPayload(e.to_string()))
    }

    /// The row's type column wins over the type stored inside the document.
    pub fn into_game(self, id: Uuid, game_type: Option<GameType>) -> Result<Game, GameError> {
        let score_results = parse_score_results(&self.result)?;
        let game_type = game_type
            .or_else(|| self.game_type.map(GameType::from))
            .unwrap_or(GameType::Classic);

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(question_idx, question)| Question {
                id: question_idx as i64,
                text: question.question,
                image_id: question.image,
                explanation: question.explanation,
                answer_options: question
                    .options
                    .into_iter()
                    .enumerate()
                    .map(|(option_idx, option)| AnswerOption {
                        id: option_idx as i64,
                        answer: option.text,
                        is_correct: option.is_correct,
                        score: option.score,
                    })
                    .collect(),
            })
            .collect();

        Ok(Game {
            id,
            game_type,
            title: self.name,
            description: self.description,
            questions,
            score_results,
        })
    }
}

pub fn parse_score_results(
    result: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<ScoreResult>, GameError> {
    result
        .iter()
        .map(|(range, text)| {
            let (from, to) = parse_range(range)?;
            let text = text.as_str().ok_or_else(|| {
                GameError::InvalidPayload(format!("result text for '{}' is not a string", range))
            })?;

            Ok(ScoreResult {
                from,
                to,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Parses `"<from>-<to>"`. A leading `-` on either bound marks it negative.
pub fn parse_range(range: &str) -> Result<(i64, i64), GameError> {
    let invalid = || GameError::InvalidPayload(format!("invalid score range: {}", range));
    let trimmed = range.trim();

    let split_at = trimmed
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-')
        .map(|(idx, _)| idx)
        .ok_or_else(invalid)?;

    let (from, to) = (&trimmed[..split_at], &trimmed[split_at + 1..]);
    let from: i64 = from.trim().parse().map_err(|_| invalid())?;
    let to: i64 = to.trim().parse().map_err(|_| invalid())?;

    if from > to {
        return Err(invalid());
    }

    Ok((from, to))
}
