use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Hash, PartialEq, Eq, Clone)]
#[serde(from = "String", into = "String")]
pub enum GameType {
    Classic,
    Daily,
    Other(String),
}

impl GameType {
    pub fn as_str(&self) -> &str {
        match self {
            GameType::Classic => "classic",
            GameType::Daily => "daily",
            GameType::Other(tag) => tag,
        }
    }

    /// Daily games are played once and cannot be reset.
    pub fn is_replayable(&self) -> bool {
        !matches!(self, GameType::Daily)
    }
}

impl From<String> for GameType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "classic" => GameType::Classic,
            "daily" => GameType::Daily,
            _ => GameType::Other(value),
        }
    }
}

impl From<GameType> for String {
    fn from(value: GameType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Game {
    pub id: Uuid,
    pub game_type: GameType,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub score_results: Vec<ScoreResult>,
}

impl Game {
    pub fn find_question(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn info(&self) -> GameInfo {
        GameInfo {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub image_id: Option<String>,
    pub explanation: Option<String>,
    pub answer_options: Vec<AnswerOption>,
}

impl Question {
    pub fn correct_option_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.answer_options
            .iter()
            .filter(|option| option.is_correct)
            .map(|option| option.id)
    }

    pub fn find_option(&self, option_id: i64) -> Option<&AnswerOption> {
        self.answer_options.iter().find(|o| o.id == option_id)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnswerOption {
    pub id: i64,
    pub answer: String,
    pub is_correct: bool,
    pub score: Option<i64>,
}

impl AnswerOption {
    /// Points this option is worth when the player's answer was judged correct.
    pub fn points(&self) -> i64 {
        self.score.unwrap_or(1)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoreResult {
    pub from: i64,
    pub to: i64,
    pub text: String,
}

impl ScoreResult {
    pub fn contains(&self, score: i64) -> bool {
        self.from <= score && score <= self.to
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub total_score: i64,
    pub result_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Question(Question),
    Result(GameResult),
}

/// Derived view of a player's position in a game. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub step: Step,
    pub progress: Progress,
    pub game_info: GameInfo,
}

impl State {
    pub fn question(&self) -> Option<&Question> {
        match &self.step {
            Step::Question(question) => Some(question),
            Step::Result(_) => None,
        }
    }

    pub fn result(&self) -> Option<&GameResult> {
        match &self.step {
            Step::Result(result) => Some(result),
            Step::Question(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/* Api models */

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptAnswerRequest {
    pub question_id: i64,
    pub answer_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptAnswerResponse {
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl From<Verdict> for AcceptAnswerResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            is_correct: verdict.is_correct,
            explanation: verdict.explanation,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOptionView {
    pub id: i64,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    pub answer_options: Vec<AnswerOptionView>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            image_id: question.image_id.clone(),
            answer_options: question
                .answer_options
                .iter()
                .map(|option| AnswerOptionView {
                    id: option.id,
                    answer: option.answer.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
    pub progress: Progress,
    pub game_info: GameInfo,
}

impl From<&State> for StateResponse {
    fn from(state: &State) -> Self {
        Self {
            question: state.question().map(QuestionView::from),
            result: state.result().cloned(),
            progress: state.progress,
            game_info: state.game_info.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGameResponse {
    pub game_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
}
