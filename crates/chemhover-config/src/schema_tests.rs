use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.classifier.threshold, 1.0);
    assert!(config.classifier.model_url.is_none());
    assert_eq!(config.channel.max_id, 1024);
    assert!(config.channel.request_timeout_ms.is_none());
    assert_eq!(config.walker.min_text_len, 2);
    assert_eq!(config.walker.overlay_id_prefix, "_ch");
    assert_eq!(config.overlay.width, 250);
    assert_eq!(config.overlay.height, 200);
    assert_eq!(config.overlay.palette, Palette::Dark);
    assert!(config.overlay.sparkle);
}

#[test]
fn test_overlay_palette_from_toml() {
    let config: Config = toml::from_str(
        r#"
        [overlay]
        palette = "light"
        sparkle = false
        "#,
    )
    .unwrap();
    assert_eq!(config.overlay.palette, Palette::Light);
    assert!(!config.overlay.sparkle);
    assert_eq!(config.overlay.width, 250);
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config: Config = toml::from_str(
        r#"
        [walker]
        max_concurrent_scans = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.walker.max_concurrent_scans, 4);
    assert_eq!(config.walker.overlay_id_prefix, "_ch");
}

#[test]
fn test_config_serialization_roundtrip_keeps_threshold() {
    let mut config = Config::default();
    config.classifier.threshold = 0.5;
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.classifier.threshold, 0.5);
}

#[test]
fn test_chemhover_dir_name() {
    assert!(chemhover_dir().ends_with(".chemhover"));
}
