//! Redis-backed session store.
//!
//! A session is an opaque UUID token mapped to a serialized principal with a
//! TTL. The principal is only an identity pointer; user data is always
//! re-read from the database per request.

use redis::{AsyncCommands, Client};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::Principal,
};

#[derive(Clone)]
pub struct SessionsService {
    client: Client,
    ttl_seconds: u64,
}

impl SessionsService {
    /// Create a new session service and verify the Redis connection
    pub async fn new(url: &str, ttl_hours: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            ttl_seconds: ttl_hours * 3600,
        })
    }

    /// Open a session for a principal and return the opaque token
    pub async fn create(&self, principal: &Principal) -> AppResult<String> {
        let mut conn = self.connection().await?;

        let token = Uuid::new_v4().to_string();
        let payload = serde_json::to_string(principal)
            .map_err(|e| AppError::Internal(format!("Failed to serialize principal: {}", e)))?;

        conn.set_ex::<_, _, ()>(session_key(&token), payload, self.ttl_seconds)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store session in Redis: {}", e)))?;

        Ok(token)
    }

    /// Resolve a token to its principal, if the session is still live
    pub async fn fetch(&self, token: &str) -> AppResult<Option<Principal>> {
        let mut conn = self.connection().await?;

        let payload: Option<String> = conn
            .get(session_key(token))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read session from Redis: {}", e)))?;

        match payload {
            Some(json) => {
                let principal = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Corrupt session payload: {}", e))
                })?;
                Ok(Some(principal))
            }
            None => Ok(None),
        }
    }

    /// Destroy a session; destroying an unknown token is a no-op
    pub async fn destroy(&self, token: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .del(session_key(token))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete session from Redis: {}", e)))?;

        Ok(())
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}
