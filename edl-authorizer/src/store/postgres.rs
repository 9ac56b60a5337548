//! [CredentialStore] backed by the `user_tokens` table.
//!
//! Enabled by the `postgres` feature.

use async_trait::async_trait;
use log::{debug, warn};
use tokio_postgres::{types::ToSql, Client, Config, NoTls, Row};

use crate::{
    connection::{ConnectionProvider, Connector},
    error::{StartupError, StoreError},
};

use super::{CredentialStore, NewCredential, StoredCredential};

pub const CREATE_USER_TOKENS: &str = "CREATE TABLE IF NOT EXISTS user_tokens (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL,
    access_token TEXT NOT NULL,
    refresh_token TEXT NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    environment TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const SELECT_FOR_USER: &str = "SELECT id, user_id, access_token, refresh_token, expires_at, created_at \
     FROM user_tokens WHERE user_id = $1 ORDER BY created_at DESC, id DESC";

const DELETE_BY_ID: &str = "DELETE FROM user_tokens WHERE id = $1";

const INSERT: &str = "INSERT INTO user_tokens (user_id, access_token, refresh_token, expires_at, environment) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING id, user_id, access_token, refresh_token, expires_at, created_at";

pub struct PostgresConnector {
    config: Config,
}

impl PostgresConnector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    type Connection = Client;

    async fn connect(&self) -> Result<Client, StoreError> {
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Postgres connection closed: {}", e);
            }
        });
        Ok(client)
    }

    fn is_healthy(&self, connection: &Client) -> bool {
        !connection.is_closed()
    }
}

pub struct PostgresCredentialStore {
    provider: ConnectionProvider<PostgresConnector>,
}

impl PostgresCredentialStore {
    pub fn new(config: Config) -> Self {
        Self {
            provider: ConnectionProvider::new(PostgresConnector::new(config)),
        }
    }

    /// Parses a `postgres://` URL or key/value connection string.
    pub fn from_connection_string(connection_string: &str) -> Result<Self, StartupError> {
        let config = connection_string
            .parse::<Config>()
            .map_err(|_| StartupError::InvalidParameter("Invalid database url".to_owned()))?;
        Ok(Self::new(config))
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.provider.acquire().await?;
        client
            .batch_execute(CREATE_USER_TOKENS)
            .await
            .map_err(|e| self.map_error(e))?;
        Ok(())
    }

    fn map_error(&self, e: tokio_postgres::Error) -> StoreError {
        if e.is_closed() {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Query(e.to_string())
        }
    }

    async fn checked<T>(
        &self,
        result: Result<T, tokio_postgres::Error>,
    ) -> Result<T, StoreError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                let error = self.map_error(e);
                if matches!(error, StoreError::Unavailable(_)) {
                    self.provider.invalidate().await;
                }
                Err(error)
            }
        }
    }
}

fn credential_from_row(row: &Row) -> Result<StoredCredential, StoreError> {
    let column_error = |e: tokio_postgres::Error| StoreError::Query(e.to_string());
    Ok(StoredCredential {
        id: row.try_get("id").map_err(column_error)?,
        user_id: row.try_get("user_id").map_err(column_error)?,
        access_token: row.try_get("access_token").map_err(column_error)?,
        refresh_token: row.try_get("refresh_token").map_err(column_error)?,
        expires_at: row.try_get("expires_at").map_err(column_error)?,
        created_at: row.try_get("created_at").map_err(column_error)?,
    })
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn fetch_credentials_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<StoredCredential>, StoreError> {
        let client = self.provider.acquire().await?;
        let rows = self
            .checked(client.query(SELECT_FOR_USER, &[&user_id]).await)
            .await?;
        debug!("Found {} stored credential(s) for user {}", rows.len(), user_id);
        rows.iter().map(credential_from_row).collect()
    }

    async fn delete_credential(&self, id: i64) -> Result<(), StoreError> {
        let client = self.provider.acquire().await?;
        self.checked(client.execute(DELETE_BY_ID, &[&id]).await)
            .await?;
        Ok(())
    }

    async fn insert_credential(
        &self,
        credential: NewCredential,
    ) -> Result<StoredCredential, StoreError> {
        let client = self.provider.acquire().await?;
        let params: [&(dyn ToSql + Sync); 5] = [
            &credential.user_id,
            &credential.access_token,
            &credential.refresh_token,
            &credential.expires_at,
            &credential.environment,
        ];
        let row = self
            .checked(client.query_one(INSERT, &params).await)
            .await?;
        credential_from_row(&row)
    }
}
