use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub s3_bucket_name: String,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub s3_endpoint: Option<String>,
    pub media_folder: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => 5000,
        };

        let cors_origins = ["ADMIN_FRONTEND_URL", "USER_FRONTEND_URL"]
            .into_iter()
            .filter_map(|name| var(name))
            .collect();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port,
            s3_bucket_name: required("S3_BUCKET_NAME")?,
            aws_region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: required("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            s3_endpoint: var("S3_ENDPOINT").map(|e| e.trim_end_matches('/').to_string()),
            media_folder: var("MEDIA_FOLDER").unwrap_or_else(|| "admin-app".to_string()),
            cors_origins,
        })
    }
}
