use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields except the API credential have defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Directory holding stored images and upload staging files.
    pub media_dir: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// OpenAI API credential. Required.
    pub openai_api_key: String,
    /// Override for the OpenAI API root (proxies, mock servers).
    pub openai_base_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `MEDIA_DIR`            | `media`                    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `OPENAI_API_KEY`       | (required)                 |
    /// | `OPENAI_BASE_URL`      | (unset: public OpenAI API) |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let media_dir =
            PathBuf::from(std::env::var("MEDIA_DIR").unwrap_or_else(|_| "media".into()));

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let openai_api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");

        let openai_base_url = std::env::var("OPENAI_BASE_URL").ok();

        Self {
            host,
            port,
            media_dir,
            request_timeout_secs,
            openai_api_key,
            openai_base_url,
        }
    }
}
