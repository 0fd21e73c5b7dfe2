// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token validity window in seconds (default: 24 hours).
    pub jwt_expiration: u64,
    pub port: u16,
    pub rust_log: String,
    /// Blob-storage bucket for uploaded images. When absent, image upload is
    /// disabled and requests carrying a file fail with a server error.
    pub s3_bucket: Option<String>,
    /// Public base URL under which uploaded objects are reachable.
    pub s3_public_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let s3_bucket = env::var("S3_BUCKET").ok();
        let s3_public_url = env::var("S3_PUBLIC_URL").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            port,
            rust_log,
            s3_bucket,
            s3_public_url,
        }
    }
}
