//! Configuration management for AIC-IF services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values
//!
//! Every section falls back to its defaults, so the gateway starts with no
//! configuration files at all.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::Result;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Citation registry query defaults
    pub registry: RegistryConfig,

    /// Knowledge graph traversal bounds
    pub graph: GraphConfig,

    /// Model interpreter settings
    pub interpreter: InterpreterConfig,

    /// Demo data and simulation settings
    pub demo: DemoConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Page size for citation log queries when no limit is given
    pub default_limit: usize,

    /// Number of works returned by the top-cited ranking
    pub top_cited_limit: usize,

    /// Number of events returned by the recent-citations feed
    pub recent_limit: usize,

    /// Upper bound applied to any client-supplied limit
    pub max_limit: usize,

    /// Impact score policy
    pub score: ImpactScoreConfig,
}

/// Impact score weights and fallbacks
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImpactScoreConfig {
    /// Weight of the raw citation count
    pub count_weight: f64,

    /// Weight of the mean contribution score
    pub contribution_weight: f64,

    /// Weight of the mean recency weight
    pub recency_weight: f64,

    /// Weight of the AI-model diversity factor
    pub diversity_weight: f64,

    /// Final multiplier
    pub scale: f64,

    /// Number of distinct AI models that saturates the diversity factor
    pub diversity_cap: usize,

    /// Contribution assumed for citations that carry none
    pub default_contribution: f64,

    /// Recency weight assumed for citations whose timestamp does not parse
    pub default_recency: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Path search depth when the client does not pass one
    pub default_max_depth: usize,

    /// Hard ceiling for path search depth
    pub max_path_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Seed reset on every attribution run
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Preload sample citations and graph entities at startup
    pub seed_sample_data: bool,

    /// Largest batch accepted by the citation simulator
    pub max_simulated_citations: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    pub log_level: String,

    /// Enable JSON logging
    pub json_logging: bool,

    /// Service name for tracing
    pub service_name: String,

    /// Install the Prometheus recorder and expose /metrics
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests per second (global)
    pub requests_per_second: u32,

    /// Burst capacity
    pub burst: u32,

    /// Enable rate limiting
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            top_cited_limit: 10,
            recent_limit: 5,
            max_limit: 1000,
            score: ImpactScoreConfig::default(),
        }
    }
}

impl Default for ImpactScoreConfig {
    fn default() -> Self {
        Self {
            count_weight: 0.4,
            contribution_weight: 0.3,
            recency_weight: 0.2,
            diversity_weight: 0.1,
            scale: 10.0,
            diversity_cap: 5,
            default_contribution: 0.5,
            default_recency: 0.5,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 3,
            max_path_depth: 6,
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            max_simulated_citations: 500,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
            service_name: "aicif".to_string(),
            metrics_enabled: true,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 50,
            burst: 100,
            enabled: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Clamp a client-supplied registry limit, falling back to `default`
    pub fn registry_limit(&self, requested: Option<usize>, default: usize) -> usize {
        requested.unwrap_or(default).min(self.registry.max_limit)
    }

    /// Clamp a client-supplied path depth to the configured ceiling
    pub fn path_depth(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.graph.default_max_depth)
            .min(self.graph.max_path_depth)
    }
}
