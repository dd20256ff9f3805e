use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;

use crate::db::store::{KeyValueStore, StorageKey, StorageResult};

/// Prefix applied to every key so the profile can share a Redis instance
const KEY_PREFIX: &str = "marquee";

/// Creates a Redis client for profile storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key-value store backed by Redis. Values never expire.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects through a connection manager, which reconnects on failure
    pub async fn connect(client: Client) -> StorageResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Redis storage connected");
        Ok(Self { conn })
    }

    fn redis_key(key: &StorageKey) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(Self::redis_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(Self::redis_key(key), value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_key_is_prefixed() {
        assert_eq!(RedisStore::redis_key(&StorageKey::UserData), "marquee:userData");
    }

    #[test]
    fn test_create_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_round_trip() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let store = RedisStore::connect(client.clone()).await.unwrap();

        store
            .set(&StorageKey::UserData, r#"{"bookmarks":[603]}"#.to_string())
            .await
            .unwrap();
        let value = store.get(&StorageKey::UserData).await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"bookmarks":[603]}"#));

        // Clean up
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn
            .del(RedisStore::redis_key(&StorageKey::UserData))
            .await
            .unwrap();
    }
}
