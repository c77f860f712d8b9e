use std::collections::HashSet;

use crate::{
    game::{
        error::GameError,
        models::{Game, GameResult, Progress, State, Step},
    },
    session::models::{RecordedAnswer, Session},
};

/// Derives the next unanswered question, or the final result once every
/// question has been answered. Pure: no I/O, same input gives same output.
pub fn resolve(game: &Game, session: &Session) -> Result<State, GameError> {
    let answered = distinct_answers(session);
    let answered_ids: HashSet<i64> = answered.iter().map(|a| a.question_id).collect();
    let total = game.questions.len() as i64;

    let next = game
        .questions
        .iter()
        .find(|question| !answered_ids.contains(&question.id));

    if let Some(question) = next {
        return Ok(State {
            step: Step::Question(question.clone()),
            progress: Progress {
                answered: answered.len() as i64,
                total,
            },
            game_info: game.info(),
        });
    }

    let total_score = total_score(game, answered)?;
    let result_text = result_text(game, total_score)?;

    Ok(State {
        step: Step::Result(GameResult {
            total_score,
            result_text,
        }),
        progress: Progress {
            answered: total,
            total,
        },
        game_info: game.info(),
    })
}

// One entry per distinct question in session order, first recorded answer wins.
fn distinct_answers(session: &Session) -> Vec<&RecordedAnswer> {
    let mut seen = HashSet::with_capacity(session.answers.len());
    session
        .answers
        .iter()
        .filter(|answer| seen.insert(answer.question_id))
        .collect()
}

/// Sums the contribution of every recorded answer. Only answers whose
/// persisted verdict is correct score, using the option's explicit score or 1.
pub fn total_score<'a, I>(game: &Game, answers: I) -> Result<i64, GameError>
where
    I: IntoIterator<Item = &'a RecordedAnswer>,
{
    let mut total: i64 = 0;
    for answer in answers {
        let question = game
            .find_question(answer.question_id)
            .ok_or(GameError::InvalidQuestionId(answer.question_id))?;

        let option =
            question
                .find_option(answer.answer_id)
                .ok_or(GameError::AnswerOptionNotFound {
                    question_id: answer.question_id,
                    option_id: answer.answer_id,
                })?;

        if answer.is_correct {
            total = total
                .checked_add(option.points())
                .ok_or(GameError::ScoreOverflow {
                    question_id: answer.question_id,
                    points: option.points(),
                })?;
        }
    }

    Ok(total)
}

/// First declared band containing the score wins.
pub fn result_text(game: &Game, total_score: i64) -> Result<String, GameError> {
    game.score_results
        .iter()
        .find(|band| band.contains(total_score))
        .map(|band| band.text.clone())
        .ok_or(GameError::NoResultForScore(total_score))
}
