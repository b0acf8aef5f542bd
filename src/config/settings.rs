use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://YOUR-PUBLIC-URL.dev";

/// Credentials and location of the R2 (S3-compatible) bucket.
#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub account_id: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub endpoint_override: Option<String>,
}

impl StorageConfig {
    /// Reads the four required R2 variables. The error names the first one missing.
    pub fn from_env() -> Result<Self, String> {
        let required = |key: EnvKey| {
            let name = key.as_str();
            env::get_opt(key).ok_or_else(|| name.to_string())
        };

        Ok(Self {
            account_id: required(EnvKey::CloudflareAccountId)?,
            access_key: required(EnvKey::R2AccessKey)?,
            secret_key: required(EnvKey::R2SecretKey)?,
            bucket: required(EnvKey::R2Bucket)?,
            endpoint_override: env::get_opt(EnvKey::S3Endpoint),
        })
    }

    pub fn endpoint(&self) -> String {
        match &self.endpoint_override {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.r2.cloudflarestorage.com", self.account_id),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    /// `None` when any R2 variable is missing; every job then fails as misconfigured.
    pub storage: Option<StorageConfig>,
    pub public_base_url: String,
    pub ffmpeg_path: String,
    pub tool_timeout_secs: u64,
    pub work_dir: PathBuf,
    pub rabbitmq_url: Option<String>,
}

impl AppConfig {
    pub fn new() -> Self {
        let storage = match StorageConfig::from_env() {
            Ok(storage) => Some(storage),
            Err(missing) => {
                tracing::error!(
                    variable = %missing,
                    "Missing environment variable: {}. Jobs will fail until CLOUDFLARE_ACCOUNT_ID, \
                     CLOUDFLARE_R2_ACCESS_KEY_ID, CLOUDFLARE_R2_SECRET_ACCESS_KEY and \
                     CLOUDFLARE_R2_BUCKET_NAME are set",
                    missing
                );
                None
            }
        };

        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            storage,
            public_base_url: normalize_base_url(&env::get_or(
                EnvKey::R2PublicUrl,
                DEFAULT_PUBLIC_BASE_URL,
            )),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            tool_timeout_secs: env::get_parsed(EnvKey::FfmpegTimeout, 0),
            work_dir: env::get_opt(EnvKey::WorkDir)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            rabbitmq_url: env::get_opt(EnvKey::RabbitMqUrl),
        }
    }

    /// Zero means the external tool may run for as long as it needs.
    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
