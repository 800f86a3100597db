use super::EventStore;
use crate::components::events::Event;
use crate::error::{store_error, Error, SchedulerResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client as RedisClient};
use tokio::sync::mpsc;
use tracing::info;

/// Redis key holding the JSON-encoded event list
pub const EVENTS_KEY: &str = "event_scheduler:events";

/// The Redis actor that owns the connection and processes store commands
pub struct RedisStoreActor {
    client: RedisClient,
    connection: Option<ConnectionManager>,
    command_rx: mpsc::Receiver<RedisCommand>,
}

/// Commands that can be sent to the Redis actor
pub enum RedisCommand {
    LoadEvents(mpsc::Sender<SchedulerResult<Vec<Event>>>),
    SaveEvents(Vec<Event>, mpsc::Sender<SchedulerResult<()>>),
    Shutdown,
}

/// Handle for communicating with the Redis actor
#[derive(Clone)]
pub struct RedisStore {
    command_tx: mpsc::Sender<RedisCommand>,
}

impl RedisStoreActor {
    /// Create a new actor and return its handle
    pub fn new(redis_url: &str) -> SchedulerResult<(Self, RedisStore)> {
        let client = RedisClient::open(redis_url)
            .map_err(|e| store_error(&format!("Failed to create Redis client: {}", e)))?;
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            client,
            connection: None,
            command_rx,
        };

        Ok((actor, RedisStore { command_tx }))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Redis store actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RedisCommand::LoadEvents(response_tx) => {
                    let result = self.load_events().await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::SaveEvents(events, response_tx) => {
                    let result = self.save_events(&events).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::Shutdown => {
                    info!("Redis store actor shutting down");
                    break;
                }
            }
        }

        info!("Redis store actor shut down");
    }

    /// Get a redis connection, connecting on first use
    async fn connection(&mut self) -> SchedulerResult<ConnectionManager> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }

        let connection = ConnectionManager::new(self.client.clone())
            .await
            .map_err(|e| store_error(&format!("Failed to connect to Redis: {}", e)))?;
        self.connection = Some(connection.clone());

        Ok(connection)
    }

    async fn load_events(&mut self) -> SchedulerResult<Vec<Event>> {
        let mut conn = self.connection().await?;

        let events_json: Option<String> = conn
            .get(EVENTS_KEY)
            .await
            .map_err(|e| -> Error {
                store_error(&format!("Failed to read events from Redis: {}", e))
            })?;

        match events_json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                self.save_events(&[]).await?;
                Ok(Vec::new())
            }
        }
    }

    async fn save_events(&mut self, events: &[Event]) -> SchedulerResult<()> {
        let mut conn = self.connection().await?;
        let events_json = serde_json::to_string(events)?;

        () = conn
            .set(EVENTS_KEY, events_json)
            .await
            .map_err(|e| -> Error {
                store_error(&format!("Failed to save events to Redis: {}", e))
            })?;

        Ok(())
    }
}

impl RedisStore {
    /// Spawn the actor on the current runtime and return its handle
    pub fn spawn(redis_url: &str) -> SchedulerResult<Self> {
        let (mut actor, handle) = RedisStoreActor::new(redis_url)?;
        tokio::spawn(async move {
            actor.run().await;
        });
        Ok(handle)
    }
}

#[async_trait]
impl EventStore for RedisStore {
    async fn load(&self) -> SchedulerResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RedisCommand::LoadEvents(response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    async fn save(&self, events: &[Event]) -> SchedulerResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RedisCommand::SaveEvents(events.to_vec(), response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| store_error("Response channel closed"))?
    }

    async fn shutdown(&self) -> SchedulerResult<()> {
        let _ = self.command_tx.send(RedisCommand::Shutdown).await;
        Ok(())
    }
}
