use super::*;

#[test]
fn empty_document_yields_defaults() {
    let cfg = AppConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.sampler_opts().unwrap(), SamplerOpts::default());
    assert_eq!(cfg.engine_opts(), EngineOpts::default());
    assert_eq!(cfg.topology().unwrap(), NetworkTopology::mnist_demo());
    assert_eq!(cfg.fps().unwrap(), Fps::new(30, 1).unwrap());
    assert_eq!(cfg.endpoint.base_url, "http://127.0.0.1:5000");
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = AppConfig::from_json_str(
        r#"{
            "endpoint": { "base_url": "http://example.test:8080" },
            "animation": { "stage_interval_ms": 100, "seed": 42 },
            "topology": { "layers": [4, 3, 2] }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.endpoint.timeout_ms, 10_000);
    assert_eq!(cfg.animation.settle_ms, 500);
    assert_eq!(cfg.engine_opts().timing.interval, Duration::from_millis(100));
    assert_eq!(cfg.topology().unwrap().class_count(), 2);
    assert_eq!(cfg.animation.seed, Some(42));
}

#[test]
fn seeded_random_source_is_reproducible() {
    let cfg = AppConfig::from_json_str(r#"{ "animation": { "seed": 7 } }"#).unwrap();
    let mut a = cfg.random_source();
    let mut b = cfg.random_source();
    let xs: Vec<f64> = (0..4).map(|_| a.next_unit()).collect();
    let ys: Vec<f64> = (0..4).map(|_| b.next_unit()).collect();
    assert_eq!(xs, ys);
}

#[test]
fn invalid_values_are_rejected() {
    for doc in [
        r#"{ "surface": { "width": 0 } }"#,
        r#"{ "surface": { "brush_radius": 0.0 } }"#,
        r#"{ "topology": { "layers": [10] } }"#,
        r#"{ "render": { "fps_den": 0 } }"#,
        r#"{ "endpoint": { "base_url": "localhost" } }"#,
    ] {
        assert!(
            matches!(AppConfig::from_json_str(doc), Err(ScopeError::Validation(_))),
            "{doc}"
        );
    }
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "animation": { "stage_interval_ms": 0 } }"#),
        Err(ScopeError::Animation(_))
    ));
    assert!(matches!(
        AppConfig::from_json_str("{ nope"),
        Err(ScopeError::Serde(_))
    ));
}
