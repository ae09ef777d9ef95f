//! Unit tests for mode validation and flag serialization

use signalq::dispatch::{DispatchSettings, ModeConfig};
use signalq::error::DispatchError;

fn watch_threshold_settings() -> DispatchSettings {
    DispatchSettings {
        mode: Some("watch-threshold".to_string()),
        strategy_id: Some(2),
        per_position_notional: Some(1500.0),
        threshold: Some(25.5),
        poll_interval_seconds: Some(60),
        ..DispatchSettings::default()
    }
}

fn watch_breakout_settings() -> DispatchSettings {
    DispatchSettings {
        mode: Some("watch-breakout".to_string()),
        strategy_id: Some(3),
        per_position_notional: Some(2000.0),
        poll_interval_seconds: Some(30),
        session_start: Some("09:30".to_string()),
        session_end: Some("16:00".to_string()),
        risk_reward: Some(2.5),
        volume_multiplier: Some(1.8),
        volume_lookback: Some(20),
        ..DispatchSettings::default()
    }
}

fn open_now_settings() -> DispatchSettings {
    DispatchSettings {
        mode: Some("open-now".to_string()),
        strategy_id: Some(1),
        capital: Some(10000.0),
        leverage: Some(2.0),
        ..DispatchSettings::default()
    }
}

fn close_only_settings() -> DispatchSettings {
    DispatchSettings {
        mode: Some("close-only".to_string()),
        strategy_id: Some(2),
        close_deviation_points: Some(10),
        force_close: Some(false),
        ..DispatchSettings::default()
    }
}

fn assert_configuration_error(result: Result<ModeConfig, DispatchError>) {
    match result {
        Err(DispatchError::Configuration(_)) => {}
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn watch_threshold_serializes_exact_flag_vector() {
    let config = ModeConfig::from_settings(&watch_threshold_settings()).unwrap();
    assert_eq!(
        config.to_args(),
        vec![
            "2",
            "--watch-threshold",
            "--per-pos-eur",
            "1500",
            "--threshold",
            "25.5",
            "--poll",
            "60",
        ]
    );
}

#[test]
fn watch_breakout_serializes_exact_flag_vector_with_defaults() {
    let config = ModeConfig::from_settings(&watch_breakout_settings()).unwrap();
    // Defaults: no confirm-close, ATR buffer and volume filter stay on, so
    // no boolean flags appear.
    assert_eq!(
        config.to_args(),
        vec![
            "3",
            "--watch-breakout",
            "--per-pos-eur",
            "2000",
            "--poll",
            "30",
            "--session-start",
            "09:30",
            "--session-end",
            "16:00",
            "--rr",
            "2.5",
            "--vol-mult",
            "1.8",
            "--vol-lookback",
            "20",
        ]
    );
}

#[test]
fn watch_breakout_emits_boolean_flags_when_toggled() {
    let settings = DispatchSettings {
        confirm_on_close: Some(true),
        use_atr_buffer: Some(false),
        use_volume_filter: Some(false),
        ..watch_breakout_settings()
    };
    let config = ModeConfig::from_settings(&settings).unwrap();
    let args = config.to_args();
    assert!(args.contains(&"--confirm-close".to_string()));
    assert!(args.contains(&"--no-atr-buffer".to_string()));
    assert!(args.contains(&"--no-volume-filter".to_string()));
}

#[test]
fn open_now_serializes_exact_flag_vector() {
    let config = ModeConfig::from_settings(&open_now_settings()).unwrap();
    assert_eq!(
        config.to_args(),
        vec!["1", "--capital", "10000", "--leverage", "2"]
    );
}

#[test]
fn close_only_serializes_exact_flag_vector() {
    let config = ModeConfig::from_settings(&close_only_settings()).unwrap();
    assert_eq!(
        config.to_args(),
        vec!["2", "--close-only", "--close-deviation", "10"]
    );
}

#[test]
fn close_only_appends_force_flag_when_set() {
    let settings = DispatchSettings {
        force_close: Some(true),
        ..close_only_settings()
    };
    let config = ModeConfig::from_settings(&settings).unwrap();
    assert_eq!(
        config.to_args().last().map(String::as_str),
        Some("--force-close")
    );
}

#[test]
fn cross_mode_fields_are_rejected() {
    // WatchThreshold tagged, CloseOnly-only fields populated.
    let settings = DispatchSettings {
        close_deviation_points: Some(10),
        force_close: Some(true),
        ..watch_threshold_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn open_now_rejects_watch_fields() {
    let settings = DispatchSettings {
        poll_interval_seconds: Some(60),
        ..open_now_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn missing_mode_is_rejected() {
    let settings = DispatchSettings {
        mode: None,
        ..close_only_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn unknown_mode_is_rejected() {
    let settings = DispatchSettings {
        mode: Some("watch-everything".to_string()),
        ..close_only_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn missing_required_field_is_rejected() {
    let settings = DispatchSettings {
        threshold: None,
        ..watch_threshold_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn negative_strategy_id_is_rejected() {
    let settings = DispatchSettings {
        strategy_id: Some(-1),
        ..close_only_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn non_positive_floats_are_rejected() {
    for bad in [0.0, -100.0] {
        let settings = DispatchSettings {
            capital: Some(bad),
            ..open_now_settings()
        };
        assert_configuration_error(ModeConfig::from_settings(&settings));
    }
}

#[test]
fn non_finite_floats_are_rejected() {
    for bad in [f64::NAN, f64::INFINITY] {
        let settings = DispatchSettings {
            leverage: Some(bad),
            ..open_now_settings()
        };
        assert_configuration_error(ModeConfig::from_settings(&settings));
    }
}

#[test]
fn malformed_session_time_is_rejected() {
    let settings = DispatchSettings {
        session_start: Some("9h30".to_string()),
        ..watch_breakout_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn inverted_session_window_is_rejected() {
    let settings = DispatchSettings {
        session_start: Some("16:00".to_string()),
        session_end: Some("09:30".to_string()),
        ..watch_breakout_settings()
    };
    assert_configuration_error(ModeConfig::from_settings(&settings));
}

#[test]
fn mode_label_matches_variant() {
    assert_eq!(
        ModeConfig::from_settings(&watch_threshold_settings())
            .unwrap()
            .mode_label(),
        "watch-threshold"
    );
    assert_eq!(
        ModeConfig::from_settings(&close_only_settings())
            .unwrap()
            .mode_label(),
        "close-only"
    );
}
