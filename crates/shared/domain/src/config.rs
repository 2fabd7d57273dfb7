use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfigInner {
    pub resolution: ResolutionConfig,
    pub catalog: CatalogConfig,
    pub composition: CompositionConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten)]
    inner: Arc<EngineConfigInner>,
}

impl Deref for EngineConfig {
    type Target = EngineConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EngineConfig {
    fn deref_mut(&mut self) -> &mut EngineConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Request-time resolution knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Language used when a lookup has no match in the requested one.
    pub default_language: String,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
    /// Upper bound for a single component fetch.
    pub fetch_timeout_ms: u64,
}

impl ResolutionConfig {
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Tag dictionary and navigation registry caches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum number of tenant indexes kept per catalog.
    pub cache_capacity: u64,
    /// Optional expiry; `None` keeps indexes until an explicit reload.
    pub cache_ttl_seconds: Option<u64>,
}

/// Component scope resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Types that always resolve from tenant scope (site chrome).
    pub global_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Extra filter directives, e.g. `clic_routing=debug`.
    pub filter: Option<String>,
    pub console: bool,
    pub format: LogFormat,
    /// Enables rolling file output when set.
    pub directory: Option<PathBuf>,
    pub max_files: usize,
}

// --- Default ---

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            default_language: "es".to_owned(),
            default_page_limit: 12,
            max_page_limit: 100,
            fetch_timeout_ms: 3_000,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { cache_capacity: 1_000, cache_ttl_seconds: None }
    }
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self { global_types: vec!["header".to_owned(), "footer".to_owned()] }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            format: LogFormat::Compact,
            directory: None,
            max_files: 7,
        }
    }
}
