use std::sync::Arc;

use crate::{
    game::acceptor::AcceptorRegistry,
    server::error::ServerError,
    store::{QuizStore, memory::MemoryStore, postgres::PgQuizStore},
};

pub struct AppState {
    store: Arc<dyn QuizStore>,
    acceptors: Arc<AcceptorRegistry>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuizStore>, acceptors: AcceptorRegistry) -> Arc<Self> {
        Arc::new(Self {
            store,
            acceptors: Arc::new(acceptors),
        })
    }

    pub async fn from_connection_string(
        connection_string: &str,
        run_migrations: bool,
    ) -> Result<Arc<Self>, ServerError> {
        let store = PgQuizStore::from_connection_string(connection_string).await?;
        if run_migrations {
            store.migrate().await?;
        }
        store.audit_games().await?;

        Ok(Self::new(Arc::new(store), AcceptorRegistry::with_defaults()))
    }

    pub fn in_memory(store: MemoryStore) -> Arc<Self> {
        Self::new(Arc::new(store), AcceptorRegistry::with_defaults())
    }

    pub fn get_store(&self) -> &dyn QuizStore {
        self.store.as_ref()
    }

    pub fn get_acceptors(&self) -> Arc<AcceptorRegistry> {
        self.acceptors.clone()
    }
}
