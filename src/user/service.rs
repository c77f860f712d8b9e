use tracing::info;

use crate::{
    server::{error::ServerError, txn::with_txn},
    store::QuizStore,
    user::models::{User, UserChat, UserData, UserSource},
};

/// Maps an outside identity to an internal user, creating the user on first
/// sight. Optionally records the chat the request came from, in the same
/// transaction.
pub async fn retrieve_user(store: &dyn QuizStore, data: UserData) -> Result<User, ServerError> {
    with_txn(store, move |tx| {
        Box::pin(async move {
            let user = match tx
                .find_user_by_source(&data.external_id, &data.source)
                .await?
            {
                Some(user) => user,
                None => {
                    let user = User::new();
                    tx.insert_user_source(&UserSource {
                        user_id: user.id,
                        external_id: data.external_id.clone(),
                        source: data.source.clone(),
                    })
                    .await?;

                    // A concurrent request may have linked this identity first.
                    let stored = tx
                        .find_user_by_source(&data.external_id, &data.source)
                        .await?
                        .unwrap_or(user);

                    info!(
                        "Created user {} for {} identity {}",
                        stored.id, data.source, data.external_id
                    );
                    stored
                }
            };

            if let (Some(chat_id), Some(chat_type)) = (data.chat_id, data.chat_type) {
                if tx.find_user_chat(user.id, chat_id).await?.is_none() {
                    tx.insert_user_chat(&UserChat {
                        user_id: user.id,
                        chat_id,
                        chat_type,
                    })
                    .await?;
                }
            }

            Ok(user)
        })
    })
    .await
}
