pub mod file;
pub mod redis;
pub mod store;
pub mod writer;

pub use file::FileStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use store::{KeyValueStore, MemoryStore, StorageError, StorageKey, StorageResult};
pub use writer::{StorageWriter, StorageWriterHandle};
