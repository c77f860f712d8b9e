use core::fmt;
use std::collections::BTreeSet;

use tracing::warn;

use crate::game::models::{Game, GameType};

/// Upper bound on distinct totals tracked when checking band coverage.
pub const MAX_ACHIEVABLE_SCORES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameDefect {
    NoAnswerOptions { question_id: i64 },
    NoCorrectOption { question_id: i64 },
    UncoveredScore { score: i64 },
    ScoreOverflow { question_id: i64 },
    TooManyScores { limit: usize },
}

impl fmt::Display for GameDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameDefect::NoAnswerOptions { question_id } => {
                write!(f, "question {} has no answer options", question_id)
            }
            GameDefect::NoCorrectOption { question_id } => {
                write!(f, "question {} has no correct option", question_id)
            }
            GameDefect::UncoveredScore { score } => {
                write!(f, "achievable score {} has no result band", score)
            }
            GameDefect::ScoreOverflow { question_id } => {
                write!(f, "total score overflows at question {}", question_id)
            }
            GameDefect::TooManyScores { limit } => {
                write!(
                    f,
                    "more than {} distinct totals, band coverage not checked",
                    limit
                )
            }
        }
    }
}

impl Game {
    /// Reports definition defects. A defective game is still served; the
    /// defect only surfaces as an error if a player actually reaches it.
    pub fn validate(&self) -> Vec<GameDefect> {
        let mut defects = Vec::new();

        for question in &self.questions {
            if question.answer_options.is_empty() {
                defects.push(GameDefect::NoAnswerOptions {
                    question_id: question.id,
                });
                continue;
            }

            let needs_correct = matches!(self.game_type, GameType::Classic | GameType::Daily);
            if needs_correct && question.correct_option_ids().next().is_none() {
                defects.push(GameDefect::NoCorrectOption {
                    question_id: question.id,
                });
            }
        }

        match self.achievable_scores() {
            Ok(scores) => {
                for score in scores {
                    if !self.score_results.iter().any(|band| band.contains(score)) {
                        defects.push(GameDefect::UncoveredScore { score });
                    }
                }
            }
            Err(defect) => defects.push(defect),
        }

        defects
    }

    /// Every total a player can finish with. Each question adds the points of
    /// the chosen option when it is correct, 0 otherwise. Gives up once the
    /// set grows past `MAX_ACHIEVABLE_SCORES` or a total overflows.
    pub fn achievable_scores(&self) -> Result<BTreeSet<i64>, GameDefect> {
        let mut totals: BTreeSet<i64> = BTreeSet::from([0]);

        for question in &self.questions {
            let contributions: BTreeSet<i64> = question
                .answer_options
                .iter()
                .map(|option| if option.is_correct { option.points() } else { 0 })
                .collect();

            if contributions.is_empty() {
                continue;
            }

            let mut next = BTreeSet::new();
            for total in &totals {
                for contribution in &contributions {
                    let sum = total.checked_add(*contribution).ok_or(
                        GameDefect::ScoreOverflow {
                            question_id: question.id,
                        },
                    )?;
                    next.insert(sum);
                }

                if next.len() > MAX_ACHIEVABLE_SCORES {
                    return Err(GameDefect::TooManyScores {
                        limit: MAX_ACHIEVABLE_SCORES,
                    });
                }
            }

            totals = next;
        }

        Ok(totals)
    }

    /// Logs every defect and returns how many there were.
    pub fn log_defects(&self) -> usize {
        let defects = self.validate();
        for defect in &defects {
            warn!("Game {} ({}) has a defect: {}", self.id, self.title, defect);
        }
        defects.len()
    }
}
