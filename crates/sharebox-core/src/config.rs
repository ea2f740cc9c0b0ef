//! Configuration module
//!
//! Environment-driven configuration for the API service: server, database,
//! authentication, storage backend selection, and upload limits.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

// Defaults
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100MB
const MIN_JWT_SECRET_LEN: usize = 32;

/// Base configuration shared by any service in the workspace.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// File service configuration.
#[derive(Clone, Debug)]
pub struct ShareboxConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Spaces, ...)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload limits
    pub max_file_size_bytes: usize,
    // Public base URL used to form share links: {public_base_url}/share/{token}
    pub public_base_url: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ShareboxConfig>);

impl Config {
    fn inner(&self) -> &ShareboxConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ShareboxConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }

    /// Addressable form of a share link: `{public_base_url}/share/{token}`.
    pub fn share_url(&self, token: &str) -> String {
        format!(
            "{}/share/{}",
            self.public_base_url().trim_end_matches('/'),
            token
        )
    }
}

impl BaseConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let db_timeout_seconds = env_parse("DB_TIMEOUT_SECONDS", DEFAULT_CONNECTION_TIMEOUT_SECS)?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            server_port,
            cors_origins,
            db_max_connections,
            db_timeout_seconds,
            jwt_secret,
            environment,
        })
    }
}

impl ShareboxConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; absence is fine in production.
        dotenvy::dotenv().ok();

        let base = BaseConfig::from_env()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => Some(
                StorageBackend::from_str(&value).map_err(|e| anyhow::anyhow!("{}", e))?,
            ),
            Err(_) => None,
        };

        let max_file_size_bytes = env_parse("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_FILE_SIZE_BYTES)?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", base.server_port));

        Ok(Self {
            base,
            database_url,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_file_size_bytes,
            public_base_url,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        if self.max_file_size_bytes == 0 {
            anyhow::bail!("MAX_FILE_SIZE_BYTES must be greater than zero");
        }

        match self.storage_backend {
            Some(StorageBackend::S3) | None => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET must be set when using the S3 storage backend");
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    anyhow::bail!(
                        "S3_REGION or AWS_REGION must be set when using the S3 storage backend"
                    );
                }
            }
            Some(StorageBackend::Local) => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    );
                }
                if self.local_storage_base_url.is_none() {
                    anyhow::bail!(
                        "LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
                    );
                }
            }
        }

        Ok(())
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: ToString,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid value (got '{}')", name, value)),
        Err(_) => Ok(default),
    }
}
