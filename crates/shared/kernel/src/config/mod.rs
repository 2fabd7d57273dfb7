use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default configuration file stem, resolved against the working directory.
const DEFAULT_FILE: &str = "clic";
/// Prefix of environment overrides (`CLIC__RESOLUTION__DEFAULT_LANGUAGE=en`).
const ENV_PREFIX: &str = "CLIC";

/// Custom error type for config loading.
#[clic_derive::clic_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: a file source overlaid with environment overrides.
///
/// 1. **File**: the explicit `path` (any format supported by the `config` crate, the
///    extension may be omitted) which then must exist, or the optional `clic` file in the
///    working directory.
/// 2. **Environment**: variables prefixed with `CLIC__`, nested with double underscores
///    (`CLIC__CATALOG__CACHE_CAPACITY` maps to `catalog.cache_capacity`).
///
/// Missing keys fall back to the serde defaults of `T`.
///
/// # Errors
/// * The explicitly requested file cannot be found or parsed.
/// * The merged values do not match the structure of `T`.
///
/// # Example
/// ```rust
/// use clic_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    layered(path, None)
}

fn layered<T>(
    path: Option<impl AsRef<Path>>,
    env_source: Option<config::Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (file, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(file.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env_source),
        );

    info!(file = %file.display(), required, "Loading configuration");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clic_domain::config::EngineConfig;

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("engine.toml");
        std::fs::write(&file, "[catalog]\ncache_capacity = 10\n[resolution]\ndefault_language = \"en\"\n")
            .unwrap();

        let env = config::Map::from([
            ("CLIC__CATALOG__CACHE_CAPACITY".to_owned(), "42".to_owned()),
            ("UNRELATED__CATALOG__CACHE_CAPACITY".to_owned(), "7".to_owned()),
        ]);
        let cfg: EngineConfig = layered(Some(&file), Some(env)).unwrap();

        assert_eq!(cfg.catalog.cache_capacity, 42);
        assert_eq!(cfg.resolution.default_language, "en");
    }
}
