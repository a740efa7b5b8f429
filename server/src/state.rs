use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use redis::aio::ConnectionManager;
use uuid::Uuid;

use super::{config::Config, database::init_redis};

pub struct AppState {
    pub config: Config,
    pub redis: ConnectionManager,
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let redis = init_redis(&config.redis_url).await;

        Arc::new(Self {
            config,
            redis,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Mutations on a lottery go through fetch-mutate-save against Redis, so
    /// concurrent requests on the same id must be serialized (two racing
    /// registrations could otherwise both pass the capacity check). Each id
    /// gets its own async mutex; different lotteries never contend.
    pub fn lock_for(&self, id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    pub fn forget_lock(&self, id: Uuid) {
        self.locks.lock().unwrap().remove(&id);
    }
}
