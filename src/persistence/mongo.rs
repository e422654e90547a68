//! MongoDB store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::PersistenceConfig;
use crate::persistence::store::{PersistenceConnector, PersistenceError, SharedStore, Store};

/// Database used when the URI names none.
pub const DEFAULT_DATABASE: &str = "orders";

/// Connects a MongoDB client.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

impl MongoConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PersistenceConnector for MongoConnector {
    async fn connect(&self, config: &PersistenceConfig) -> Result<SharedStore, PersistenceError> {
        let store = MongoStore::connect(config).await?;
        Ok(Arc::new(store))
    }
}

/// An open MongoDB client and the database the service works in.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Parse `config.uri`, apply the fixed options and confirm a server answers.
    ///
    /// The driver connects lazily, so a `ping` round trip makes an unreachable
    /// server fail here instead of on the first query.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self, PersistenceError> {
        let options = client_options(config).await?;
        let client =
            Client::with_options(options).map_err(|e| PersistenceError::InvalidUri(e.to_string()))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistenceError::Connect(e.to_string()))?;

        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        Ok(Self { client, database })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The database the application layer reads and writes.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

/// Driver options for `config`, with the fixed option set applied.
pub async fn client_options(config: &PersistenceConfig) -> Result<ClientOptions, PersistenceError> {
    let mut options = ClientOptions::parse(config.uri.as_str())
        .await
        .map_err(|e| PersistenceError::InvalidUri(e.to_string()))?;

    let timeout = Duration::from_secs(config.server_selection_timeout_secs);
    options.app_name = Some(config.application_name.clone());
    options.max_pool_size = Some(config.max_pool_size);
    options.server_selection_timeout = Some(timeout);
    options.connect_timeout = Some(timeout);

    Ok(options)
}

impl Store for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
