use serde::Deserialize;

/// Where the profile record is persisted
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// Optional TMDB v4 read access token, sent as a bearer token
    #[serde(default)]
    pub tmdb_access_token: Option<String>,

    /// Identity Toolkit base URL
    #[serde(default = "default_identity_api_url")]
    pub identity_api_url: String,

    /// Identity Toolkit web API key
    pub identity_api_key: String,

    /// Profile storage backend
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// Directory for the file storage backend
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Redis connection URL, used by the redis storage backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_identity_api_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_storage_dir() -> String {
    "./data".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_iter(vars(&[
            ("TMDB_API_KEY", "tmdb"),
            ("IDENTITY_API_KEY", "identity"),
        ]))
        .unwrap();

        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_access_token, None);
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert_eq!(config.storage_dir, "./data");
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_iter(vars(&[
            ("TMDB_API_KEY", "tmdb"),
            ("TMDB_ACCESS_TOKEN", "token"),
            ("IDENTITY_API_KEY", "identity"),
            ("STORAGE_BACKEND", "redis"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.tmdb_access_token.as_deref(), Some("token"));
        assert_eq!(config.storage_backend, StorageBackend::Redis);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = Config::from_iter(vars(&[("IDENTITY_API_KEY", "identity")]));
        assert!(result.is_err());
    }
}
