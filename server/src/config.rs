use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub convert_api_url: String,
    pub convert_api_key: Option<String>,
    pub room_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            convert_api_url: env::var("CONVERT_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".into()),
            convert_api_key: env::var("CONVERT_API_KEY").ok(),
            room_ttl_secs: env::var("ROOM_TTL_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3600),
        }
    }
}
