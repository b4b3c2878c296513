use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    database::RedisStore,
    deferred::{self, DeferredQueue},
    memory::MemoryStore,
    sessions::SessionProvider,
    store::ContentStore,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ContentStore>,
    pub sessions: SessionProvider,
    pub deferred: DeferredQueue,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store: Arc<dyn ContentStore> = match config.store {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await),
        };

        let (deferred, runner) = deferred::channel(store.clone());
        tokio::spawn(runner.run());

        Arc::new(Self {
            config,
            store,
            sessions: SessionProvider::new(),
            deferred,
        })
    }
}
