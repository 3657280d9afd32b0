use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL under which this server is publicly reachable; used to build
    /// stored-file URLs (default: `http://localhost:3000`).
    pub public_base_url: String,
    /// Directory uploaded blobs are stored under (default: `./data/uploads`).
    pub storage_root: PathBuf,
    /// Maximum accepted upload size in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Ads provider OAuth settings; `None` until `ADS_CLIENT_ID` is set.
    pub ads: Option<AdsConfig>,
    /// Shared secret for verifying payment webhook signatures; `None`
    /// accepts unsigned deliveries (local development).
    pub payments_webhook_secret: Option<String>,
}

/// OAuth + API settings for the ads-metrics provider.
#[derive(Debug, Clone)]
pub struct AdsConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Browser-facing authorization endpoint.
    pub authorize_url: String,
    /// Server-to-server code exchange endpoint.
    pub token_url: String,
    /// Base URL for metric pulls.
    pub api_base_url: String,
    /// Redirect URI registered with the provider.
    pub redirect_url: String,
}

/// Default maximum upload size: 20 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                     |
    /// |----------------------------|-----------------------------|
    /// | `HOST`                     | `0.0.0.0`                   |
    /// | `PORT`                     | `3000`                      |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                        |
    /// | `PUBLIC_BASE_URL`          | `http://localhost:3000`     |
    /// | `STORAGE_ROOT`             | `./data/uploads`            |
    /// | `MAX_UPLOAD_BYTES`         | `20971520`                  |
    /// | `PAYMENTS_WEBHOOK_SECRET`  | unset (accept unsigned)     |
    /// | `ADS_*`                    | unset (integration off)     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let storage_root =
            PathBuf::from(std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "./data/uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let payments_webhook_secret = std::env::var("PAYMENTS_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            storage_root,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            ads: AdsConfig::from_env(),
            payments_webhook_secret,
        }
    }
}

impl AdsConfig {
    /// Load the ads provider settings. Returns `None` when `ADS_CLIENT_ID`
    /// is unset; the integration endpoints then answer 400.
    ///
    /// # Panics
    ///
    /// Panics if `ADS_CLIENT_ID` is set but `ADS_CLIENT_SECRET` is missing,
    /// so a half-configured deployment fails fast.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("ADS_CLIENT_ID").ok().filter(|s| !s.is_empty())?;
        let client_secret = std::env::var("ADS_CLIENT_SECRET")
            .expect("ADS_CLIENT_SECRET must be set when ADS_CLIENT_ID is set");

        let authorize_url = std::env::var("ADS_AUTHORIZE_URL")
            .unwrap_or_else(|_| "https://ads.example.com/oauth/authorize".into());
        let token_url = std::env::var("ADS_TOKEN_URL")
            .unwrap_or_else(|_| "https://ads.example.com/oauth/token".into());
        let api_base_url = std::env::var("ADS_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.ads.example.com/v1".into())
            .trim_end_matches('/')
            .to_string();
        let redirect_url = std::env::var("ADS_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api/v1/integrations/ads/callback".into());

        Some(Self {
            client_id,
            client_secret,
            authorize_url,
            token_url,
            api_base_url,
            redirect_url,
        })
    }
}
