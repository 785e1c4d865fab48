//! Server configuration for the VacQ REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VACQ_SERVER_PORT` | 5000 | Server port |
//! | `VACQ_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `VACQ_LOG_LEVEL` | info | Log level |
//! | `VACQ_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `VACQ_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `VACQ_ENABLE_CORS` | true | Enable CORS |
//! | `VACQ_CORS_ORIGINS` | * | Allowed origins |
//! | `VACQ_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `VACQ_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `VACQ_ENABLE_REQUEST_ID` | true | Tag requests with `x-request-id` |
//! | `VACQ_DATABASE_URL` | vacq.db | SQLite database path (`:memory:` allowed) |
//! | `VACQ_API_PREFIX` | /api/v1 | Path prefix for the hospital routes |
//! | `VACQ_DEFAULT_PAGE_SIZE` | 25 | Page size when `limit` is absent |
//! | `VACQ_OPERATOR_REWRITE` | structural | Filter operator syntax (`structural` or `textual`) |
//!
//! # Example
//!
//! ```rust
//! use vacq_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use clap::{Parser, ValueEnum};

/// How bracketed comparison operators in list queries are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OperatorRewriteMode {
    /// Only keys of the form `field[op]` become comparisons.
    #[default]
    Structural,
    /// Every whole-word operator token in the serialized filter gets a `$`
    /// prefix, values included. Kept for clients of the old query syntax.
    Textual,
}

/// Server configuration for the VacQ REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "vacq")]
#[command(about = "VacQ hospital and appointment API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "VACQ_SERVER_PORT", default_value = "5000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "VACQ_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "VACQ_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "VACQ_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "VACQ_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "VACQ_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "VACQ_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "VACQ_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "VACQ_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Enable request ID tracking.
    #[arg(long, env = "VACQ_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// SQLite database path, or `:memory:` for an in-memory database.
    #[arg(long, env = "VACQ_DATABASE_URL", default_value = "vacq.db")]
    pub database_url: String,

    /// Path prefix under which the hospital routes are mounted.
    #[arg(long, env = "VACQ_API_PREFIX", default_value = "/api/v1")]
    pub api_prefix: String,

    /// Page size used when a list request has no usable `limit`.
    #[arg(long, env = "VACQ_DEFAULT_PAGE_SIZE", default_value = "25")]
    pub default_page_size: u64,

    /// Filter operator syntax accepted by list requests.
    #[arg(
        long,
        env = "VACQ_OPERATOR_REWRITE",
        value_enum,
        default_value = "structural"
    )]
    pub operator_rewrite: OperatorRewriteMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            enable_request_id: true,
            database_url: "vacq.db".to_string(),
            api_prefix: "/api/v1".to_string(),
            default_page_size: 25,
            operator_rewrite: OperatorRewriteMode::Structural,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse_from(["vacq"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the API prefix with one leading and no trailing slash, or `""`
    /// for the root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Returns true if the database lives in memory.
    pub fn is_memory_database(&self) -> bool {
        self.database_url == ":memory:"
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            enable_request_id: false,
            database_url: ":memory:".to_string(),
            api_prefix: "/api/v1".to_string(),
            default_page_size: 25,
            operator_rewrite: OperatorRewriteMode::Structural,
        }
    }
}
