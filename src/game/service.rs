use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    game::{
        acceptor::AcceptorRegistry,
        error::{ErrorKind, GameError},
        models::{Game, State, Verdict},
        resolver,
    },
    server::{error::ServerError, txn::with_txn},
    session::models::{AppendOutcome, RecordedAnswer},
    store::{QuizStore, QuizTx},
};

#[derive(Debug, Clone, Copy)]
pub struct AcceptAnswerInput {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub question_id: i64,
    pub answer_id: i64,
}

pub async fn load_game(tx: &mut dyn QuizTx, game_id: Uuid) -> Result<Game, ServerError> {
    let game = tx
        .load_games(&[game_id])
        .await?
        .into_iter()
        .next()
        .ok_or(GameError::GameNotFound(game_id))?;

    Ok(game)
}

pub async fn get_daily_game(store: &dyn QuizStore) -> Result<Game, ServerError> {
    with_txn(store, |tx| {
        Box::pin(async move {
            let game = tx
                .load_daily_game()
                .await?
                .ok_or(GameError::DailyGameNotFound)?;

            Ok(game)
        })
    })
    .await
}

pub async fn get_current_state(
    store: &dyn QuizStore,
    game_id: Uuid,
    player_id: Uuid,
) -> Result<State, ServerError> {
    with_txn(store, move |tx| {
        Box::pin(async move {
            let game = load_game(tx, game_id).await?;
            let session = tx.load_session(game_id, player_id).await?;

            let state = resolver::resolve(&game, &session).map_err(|e| {
                if e.kind() == ErrorKind::DataIntegrity {
                    error!(
                        "Failed to resolve state for game {} and player {}: {}",
                        game_id, player_id, e
                    );
                }
                e
            })?;

            Ok(state)
        })
    })
    .await
}

/// Judges and records an answer. Answering the same question again returns
/// the verdict recorded the first time and writes nothing.
pub async fn accept_answer(
    store: &dyn QuizStore,
    acceptors: Arc<AcceptorRegistry>,
    input: AcceptAnswerInput,
) -> Result<Verdict, ServerError> {
    with_txn(store, move |tx| {
        Box::pin(async move {
            let game = load_game(tx, input.game_id).await?;

            if game.questions.is_empty() {
                return Err(GameError::QuestionNotFound(input.question_id).into());
            }

            let question = game
                .find_question(input.question_id)
                .ok_or(GameError::QuestionNotFound(input.question_id))?;

            let session = tx.load_session(input.game_id, input.player_id).await?;
            if let Some(previous) = session.answer_for(input.question_id) {
                debug!(
                    "Question {} in game {} already answered by player {}",
                    input.question_id, input.game_id, input.player_id
                );
                return Ok(Verdict {
                    is_correct: previous.is_correct,
                    explanation: question.explanation.clone(),
                });
            }

            let acceptor = acceptors.get(&game.game_type).map_err(|e| {
                error!("No acceptor for game {}: {}", game.id, e);
                e
            })?;

            let is_correct = acceptor.accept(question, &[input.answer_id])?;
            let answer = RecordedAnswer::new(input.question_id, input.answer_id, is_correct);

            match tx
                .append_answer(input.game_id, input.player_id, &answer)
                .await?
            {
                AppendOutcome::Inserted => {
                    info!(
                        "Player {} answered question {} in game {} (correct: {})",
                        input.player_id, input.question_id, input.game_id, is_correct
                    );

                    Ok(Verdict {
                        is_correct,
                        explanation: question.explanation.clone(),
                    })
                }
                AppendOutcome::AlreadyAnswered => {
                    warn!(
                        "Concurrent answer detected for question {} in game {} by player {}",
                        input.question_id, input.game_id, input.player_id
                    );

                    let session = tx.load_session(input.game_id, input.player_id).await?;
                    let previous = session.answer_for(input.question_id).ok_or_else(|| {
                        ServerError::Internal(
                            "Answer conflict reported but no stored answer was found".into(),
                        )
                    })?;

                    Ok(Verdict {
                        is_correct: previous.is_correct,
                        explanation: question.explanation.clone(),
                    })
                }
            }
        })
    })
    .await
}

/// Clears the player's answers. Daily games cannot be replayed, so this is a
/// no-op for them.
pub async fn reset(
    store: &dyn QuizStore,
    game_id: Uuid,
    player_id: Uuid,
) -> Result<(), ServerError> {
    with_txn(store, move |tx| {
        Box::pin(async move {
            let game = load_game(tx, game_id).await?;

            if !game.game_type.is_replayable() {
                debug!("Ignoring reset of {} game {}", game.game_type, game_id);
                return Ok(());
            }

            tx.clear_session(game_id, player_id).await?;
            info!("Reset game {} for player {}", game_id, player_id);
            Ok(())
        })
    })
    .await
}
