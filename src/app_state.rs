use sqlx::PgPool;

use crate::config;
use crate::feed::ChangeHub;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub hub: ChangeHub,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config, hub: ChangeHub) -> Self {
        Self { db, env, hub }
    }
}
