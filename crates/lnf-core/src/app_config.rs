use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for the API client and the command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Base URL every endpoint path is appended to. May be relative (`/api`).
    pub api_base_url: String,
    /// Host serving uploaded images; `None` means same-origin `/images/...`.
    pub api_host: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub token_store_path: PathBuf,
}
