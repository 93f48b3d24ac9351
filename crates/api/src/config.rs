use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. Secrets are required: a missing secret fails startup rather
/// than falling back to a literal value.
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
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT validation configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Access-policy configuration (watermark secret, caps, rate limits).
    pub access: AccessConfig,
    /// Base URL of the payments entitlement service. When unset, premium
    /// notes are locked for everyone (fail closed).
    pub entitlement_service_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                    |
    /// | `ENTITLEMENT_SERVICE_URL` | unset                   |
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let entitlement_service_url = std::env::var("ENTITLEMENT_SERVICE_URL").ok();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            access: AccessConfig::from_env(),
            entitlement_service_url,
        }
    }
}

/// Default view-session lifetime in minutes.
const DEFAULT_SESSION_TTL_MINS: i64 = 30;
/// Default cap on concurrent live sessions per (note, user).
const DEFAULT_SESSION_CAP: i64 = 2;
/// Default request count admitted per rate-limit window.
const DEFAULT_RATE_LIMIT_MAX: i64 = 60;
/// Default sliding rate-limit window in seconds.
const DEFAULT_RATE_LIMIT_WINDOW_SECS: i64 = 120;

/// Access-policy configuration: watermark signing secret, session caps, and
/// rate limits.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// HMAC secret for token hashing and watermark signing.
    pub watermark_secret: String,
    /// View-session lifetime in minutes.
    pub session_ttl_mins: i64,
    /// Maximum concurrent live sessions per (note, user).
    pub session_cap: i64,
    /// Requests admitted per rate-limit window per (note, user).
    pub rate_limit_max: i64,
    /// Sliding rate-limit window in seconds.
    pub rate_limit_window_secs: i64,
}

impl AccessConfig {
    /// Load access-policy configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `WATERMARK_SECRET`       | **yes**  | --      |
    /// | `SESSION_TTL_MINS`       | no       | `30`    |
    /// | `SESSION_CAP`            | no       | `2`     |
    /// | `RATE_LIMIT_MAX`         | no       | `60`    |
    /// | `RATE_LIMIT_WINDOW_SECS` | no       | `120`   |
    ///
    /// # Panics
    ///
    /// Panics if `WATERMARK_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let watermark_secret = std::env::var("WATERMARK_SECRET")
            .expect("WATERMARK_SECRET must be set in the environment");
        assert!(
            !watermark_secret.is_empty(),
            "WATERMARK_SECRET must not be empty"
        );

        Self {
            watermark_secret,
            session_ttl_mins: env_i64("SESSION_TTL_MINS", DEFAULT_SESSION_TTL_MINS),
            session_cap: env_i64("SESSION_CAP", DEFAULT_SESSION_CAP),
            rate_limit_max: env_i64("RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX),
            rate_limit_window_secs: env_i64(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            ),
        }
    }
}

/// Object-store configuration: local filesystem for development, S3 for
/// production deployments.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Fs {
        root: String,
    },
    S3 {
        bucket: String,
        endpoint: String,
        region: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

impl StorageConfig {
    /// Load object-store configuration from environment variables.
    ///
    /// | Env Var                | Applies to | Default           |
    /// |------------------------|------------|-------------------|
    /// | `STORAGE_BACKEND`      | both       | `fs`              |
    /// | `STORAGE_ROOT`         | fs         | `storage/content` |
    /// | `S3_BUCKET`            | s3         | required          |
    /// | `S3_ENDPOINT`          | s3         | required          |
    /// | `S3_REGION`            | s3         | `auto`            |
    /// | `S3_ACCESS_KEY_ID`     | s3         | required          |
    /// | `S3_SECRET_ACCESS_KEY` | s3         | required          |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend or a missing required S3 setting.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "fs".into());
        match backend.as_str() {
            "fs" => StorageConfig::Fs {
                root: std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage/content".into()),
            },
            "s3" => StorageConfig::S3 {
                bucket: std::env::var("S3_BUCKET").expect("S3_BUCKET must be set"),
                endpoint: std::env::var("S3_ENDPOINT").expect("S3_ENDPOINT must be set"),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "auto".into()),
                access_key_id: std::env::var("S3_ACCESS_KEY_ID")
                    .expect("S3_ACCESS_KEY_ID must be set"),
                secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY")
                    .expect("S3_SECRET_ACCESS_KEY must be set"),
            },
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Expected 'fs' or 's3'"),
        }
    }
}

fn env_i64(var: &str, default: i64) -> i64 {
    std::env::var(var)
        .ok()
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{var} must be a valid i64"))
        })
        .unwrap_or(default)
}
