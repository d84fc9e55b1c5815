//! Configuration loading and management

use crate::core::query::PageLimits;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "0.0.0.0:8080")
    pub bind: String,

    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Session token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret, required: there is no built-in default
    pub jwt_secret: String,

    /// Value of the `iss` claim
    pub issuer: String,

    /// Token lifetime
    pub token_ttl_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "snapgraph".to_string(),
            token_ttl_seconds: 7 * 24 * 3600,
        }
    }
}

/// Page size limits per listing kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub posts: PageLimits,
    pub comments: PageLimits,
    pub likes: PageLimits,
    pub users: PageLimits,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            posts: PageLimits::new(21, 30),
            comments: PageLimits::new(20, 50),
            likes: PageLimits::new(50, 70),
            users: PageLimits::new(20, 50),
        }
    }
}

/// Presentation of soft-deleted comments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Author display name shown for a deleted comment
    pub deleted_display_name: String,

    /// Content stored in place of a deleted comment's text
    pub deleted_content: String,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            deleted_display_name: "[Removed]".to_string(),
            deleted_content: "[Deleted]".to_string(),
        }
    }
}

/// Database connection settings (used by the `postgres` feature)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub comments: CommentConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply `SNAPGRAPH_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment in production)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind) = lookup("SNAPGRAPH_BIND") {
            self.server.bind = bind;
        }
        if let Some(level) = lookup("SNAPGRAPH_LOG") {
            self.server.log_level = level;
        }
        if let Some(secret) = lookup("SNAPGRAPH_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(url) = lookup("SNAPGRAPH_DATABASE_URL") {
            self.database.url = Some(url);
        }
        self
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            bail!("auth.jwt_secret must be set (YAML auth.jwt_secret or SNAPGRAPH_JWT_SECRET)");
        }
        if self.auth.token_ttl_seconds <= 0 {
            bail!("auth.token_ttl_seconds must be positive");
        }

        let listings = [
            ("posts", self.pagination.posts),
            ("comments", self.pagination.comments),
            ("likes", self.pagination.likes),
            ("users", self.pagination.users),
        ];
        for (name, limits) in listings {
            if limits.max_size == 0 {
                bail!("pagination.{name}.max_size must be positive");
            }
            if limits.default_size == 0 || limits.default_size > limits.max_size {
                bail!("pagination.{name}.default_size must be between 1 and max_size");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.pagination.posts, PageLimits::new(21, 30));
        assert_eq!(config.pagination.likes, PageLimits::new(50, 70));
        assert_eq!(config.comments.deleted_display_name, "[Removed]");
        assert!(config.auth.jwt_secret.is_empty());
    }

    #[test]
    fn test_validate_requires_configured_secret() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());

        let env: HashMap<&str, &str> = HashMap::from([("SNAPGRAPH_JWT_SECRET", "from-env")]);
        let config = AppConfig::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
            server:
                bind: "0.0.0.0:9000"
            pagination:
                comments:
                    default_size: 10
                    max_size: 25
        "#;

        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.pagination.comments, PageLimits::new(10, 25));
        assert_eq!(config.pagination.users, PageLimits::new(20, 50));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.auth.issuer, config.auth.issuer);
        assert_eq!(parsed.pagination.posts, config.pagination.posts);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SNAPGRAPH_BIND", "0.0.0.0:1234"),
            ("SNAPGRAPH_JWT_SECRET", "s3cret"),
        ]);

        let config = AppConfig::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.server.bind, "0.0.0.0:1234");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "a-real-secret".to_string();
        config.pagination.likes = PageLimits::new(80, 70);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
