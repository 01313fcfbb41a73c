use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Suggestion service endpoint used to confirm movie titles
    #[serde(default = "default_suggestion_api_url")]
    pub suggestion_api_url: String,

    /// Origin allowed by the CORS layer
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout applied to every outbound HTTP call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Upper bound on suggestion lookups in flight across all requests
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_suggestion_api_url() -> String {
    "https://cinenerdle-suggestion-server-e031df6af7d2.herokuapp.com/suggestion-list/movies"
        .to_string()
}

fn default_allowed_origin() -> String {
    "https://miu-lruma.github.io".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_lookups() -> usize {
    16
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let vars = vec![("tmdb_api_key".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert!(config.suggestion_api_url.ends_with("/suggestion-list/movies"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.max_concurrent_lookups, 16);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let vars: Vec<(String, String)> = vec![("port".to_string(), "8080".to_string())];
        let result = envy::from_iter::<_, Config>(vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let vars = vec![
            ("tmdb_api_key".to_string(), "secret".to_string()),
            ("port".to_string(), "8080".to_string()),
            ("max_concurrent_lookups".to_string(), "4".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_concurrent_lookups, 4);
    }
}
