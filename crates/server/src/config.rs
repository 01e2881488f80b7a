use std::path::PathBuf;

/// Runtime settings the HTTP layer needs. Built once at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// HS256 signing secret for access tokens.
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    /// Directory receiving KYC uploads, served under `/storage`.
    pub storage_dir: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            secret_key: "change-me".to_string(),
            access_token_expire_minutes: 120,
            storage_dir: PathBuf::from("storage"),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://frontend:3000".to_string(),
            ],
        }
    }
}
