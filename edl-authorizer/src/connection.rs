use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Opens connections for a [ConnectionProvider].
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Send + Sync;

    async fn connect(&self) -> Result<Self::Connection, StoreError>;

    fn is_healthy(&self, connection: &Self::Connection) -> bool;
}

/// Process wide store connection, shared across invocations.
///
/// The first [acquire](ConnectionProvider::acquire) opens the connection,
/// later calls reuse it while it is healthy and reopen it once it is not.
pub struct ConnectionProvider<C: Connector> {
    connector: C,
    current: Mutex<Option<Arc<C::Connection>>>,
}

impl<C: Connector> ConnectionProvider<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            current: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) -> Result<Arc<C::Connection>, StoreError> {
        let mut current = self.current.lock().await;
        if let Some(connection) = current.as_ref() {
            if self.connector.is_healthy(connection) {
                return Ok(connection.clone());
            }
            debug!("Cached store connection is unhealthy, reconnecting");
        }
        let connection = Arc::new(self.connector.connect().await?);
        info!("Opened store connection");
        current.replace(connection.clone());
        Ok(connection)
    }

    /// Drops the cached connection so the next acquire reconnects.
    pub async fn invalidate(&self) {
        self.current.lock().await.take();
    }
}
