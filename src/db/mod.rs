use super::Result;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
};

pub mod contact;

#[derive(Debug, Clone)]
pub struct SurrealDbConfig {
    pub connection_string: String,
    pub namespace: String,
    pub database: String,
}

impl SurrealDbConfig {
    pub fn new(connection_string: &str) -> Self {
        Self {
            connection_string: connection_string.to_owned(),
            ..Default::default()
        }
    }
}

impl Default for SurrealDbConfig {
    fn default() -> Self {
        Self {
            connection_string: "ws://localhost:8000".to_owned(),
            namespace: "contactbook".to_owned(),
            database: "contactbook".to_owned(),
        }
    }
}

pub async fn get_surreal_db(config: &SurrealDbConfig) -> Result<Surreal<Any>> {
    let db = connect(&config.connection_string).await?;
    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;
    Ok(db)
}
