use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the precomputed catalog + similarity matrix artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Timeout for a single metadata lookup, in seconds
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Maximum number of concurrent browse sessions kept in memory
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,

    /// Idle time after which a browse session may be dropped, in seconds
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_artifact_path() -> String {
    "movie_recommender.json".to_string()
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    5
}

fn default_session_capacity() -> usize {
    10_000
}

fn default_session_idle_secs() -> u64 {
    30 * 60
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
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
