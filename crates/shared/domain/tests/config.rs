use clic_domain::config::{CompositionConfig, EngineConfig, LogFormat, ResolutionConfig};
use serde_json::json;
use std::time::Duration;

#[test]
fn config_defaults_are_sane() {
    let resolution = ResolutionConfig::default();
    assert_eq!(resolution.default_language, "es");
    assert_eq!(resolution.default_page_limit, 12);
    assert!(resolution.max_page_limit >= resolution.default_page_limit);
    assert_eq!(resolution.fetch_timeout(), Duration::from_secs(3));

    let composition = CompositionConfig::default();
    assert_eq!(composition.global_types, vec!["header".to_owned(), "footer".to_owned()]);

    let cfg = EngineConfig::default();
    assert!(cfg.catalog.cache_ttl_seconds.is_none());
    assert_eq!(cfg.logging.format, LogFormat::Compact);
}

#[test]
fn engine_config_deserializes_partial_sections() {
    let raw = json!({
        "resolution": { "default_language": "en", "fetch_timeout_ms": 250 },
        "composition": { "global_types": ["header", "footer", "whatsapp"] },
        "logging": { "level": "debug", "format": "json" }
    });

    let cfg: EngineConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.resolution.default_language, "en");
    assert_eq!(cfg.resolution.default_page_limit, 12);
    assert_eq!(cfg.resolution.fetch_timeout(), Duration::from_millis(250));
    assert_eq!(cfg.composition.global_types.len(), 3);
    assert_eq!(cfg.logging.format, LogFormat::Json);
    assert!(cfg.logging.console);
}

#[test]
fn deref_mut_copies_on_write() {
    let original = EngineConfig::default();
    let mut tuned = original.clone();
    tuned.resolution.max_page_limit = 24;

    assert_eq!(original.resolution.max_page_limit, 100);
    assert_eq!(tuned.resolution.max_page_limit, 24);
}
