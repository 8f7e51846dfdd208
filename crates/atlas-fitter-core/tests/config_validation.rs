use atlas_fitter_core::{fit_areas, FitError, FitItem, FitterConfig};

#[test]
fn default_config_is_valid() {
    assert!(FitterConfig::default().validate().is_ok());
}

#[test]
fn zero_min_bin_count_is_rejected() {
    let cfg = FitterConfig {
        min_bin_count: 0,
        ..Default::default()
    };
    match cfg.validate() {
        Err(FitError::InvalidConfig(msg)) => assert!(msg.contains("min_bin_count")),
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn invalid_config_is_rejected_at_the_entry_point() {
    let cfg = FitterConfig {
        min_bin_count: 0,
        ..Default::default()
    };
    let items = vec![FitItem::new("a", 10, 10), FitItem::new("b", 10, 10)];
    assert!(matches!(
        fit_areas(items, &cfg),
        Err(FitError::InvalidConfig(_))
    ));
}

#[test]
fn builder_sets_all_fields() {
    let cfg = FitterConfig::builder()
        .with_max_dimensions(512, 256)
        .max_bin_size(100_000)
        .min_bin_count(2)
        .fit_calls_limit(5_000)
        .parallel(true)
        .build();
    assert_eq!(cfg.max_width, 512);
    assert_eq!(cfg.max_height, 256);
    assert_eq!(cfg.max_bin_size, 100_000);
    assert_eq!(cfg.min_bin_count, 2);
    assert_eq!(cfg.fit_calls_limit, 5_000);
    assert!(cfg.parallel);
}

#[test]
fn config_round_trips_through_serde() {
    let cfg = FitterConfig {
        max_width: 300,
        max_height: 300,
        max_bin_size: 90_000,
        min_bin_count: 2,
        fit_calls_limit: 10_000,
        parallel: false,
    };
    let json = serde_json::to_string(&cfg).expect("serializes");
    let back: FitterConfig = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back.max_width, cfg.max_width);
    assert_eq!(back.max_height, cfg.max_height);
    assert_eq!(back.max_bin_size, cfg.max_bin_size);
    assert_eq!(back.min_bin_count, cfg.min_bin_count);
    assert_eq!(back.fit_calls_limit, cfg.fit_calls_limit);
}

#[test]
fn partial_config_fills_serde_defaults() {
    let back: FitterConfig =
        serde_json::from_str(r#"{"max_width": 128, "max_height": 64}"#).expect("deserializes");
    assert_eq!(back.max_width, 128);
    assert_eq!(back.max_height, 64);
    assert_eq!(back.min_bin_count, 1);
    assert!(!back.parallel);
}
