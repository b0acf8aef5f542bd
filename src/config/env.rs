use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    CloudflareAccountId,
    R2AccessKey,
    R2SecretKey,
    R2Bucket,
    R2PublicUrl,
    S3Endpoint,
    RabbitMqUrl,
    FfmpegPath,
    FfmpegTimeout,
    WorkDir,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::CloudflareAccountId => "CLOUDFLARE_ACCOUNT_ID",
            EnvKey::R2AccessKey => "CLOUDFLARE_R2_ACCESS_KEY_ID",
            EnvKey::R2SecretKey => "CLOUDFLARE_R2_SECRET_ACCESS_KEY",
            EnvKey::R2Bucket => "CLOUDFLARE_R2_BUCKET_NAME",
            EnvKey::R2PublicUrl => "CLOUDFLARE_R2_PUBLIC_URL",
            EnvKey::S3Endpoint => "S3_ENDPOINT_URL",
            EnvKey::RabbitMqUrl => "RABBITMQ_URL",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::FfmpegTimeout => "FFMPEG_TIMEOUT_SECS",
            EnvKey::WorkDir => "WORK_DIR",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Like [`get`], but treats a blank value as unset.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str())
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    get_opt(key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
