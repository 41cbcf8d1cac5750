use conclave_core::errors::ValidationError;
use conclave_core::models::*;

#[test]
fn expert_half_life_range_is_enforced() {
    assert!(Expert::new("a", 30.0).is_ok());
    assert!(Expert::new("a", 900.0).is_ok());
    assert!(Expert::new("a", 29.9).is_err());
    assert!(Expert::new("a", 0.0).is_err());
    assert!(Expert::new("a", f64::INFINITY).is_err());
}

#[test]
fn performance_stats_must_be_normalized() {
    let mut stats = PerformanceStats {
        expert_id: ExpertId::from("a"),
        accuracy: 0.6,
        recent_performance: 0.5,
        consistency: 0.7,
        calibration_quality: 0.8,
        specialization_strength: 0.4,
    };
    stats.validate().unwrap();
    stats.consistency = 1.2;
    assert_eq!(
        stats.validate(),
        Err(ValidationError::InvalidMetric { field: "consistency", value: 1.2 })
    );
}

#[test]
fn prediction_confidence_bounds() {
    let p = Prediction::new("a", "g1", "winner", "home", 0.7);
    p.check_confidence().unwrap();
    let p = Prediction::new("a", "g1", "winner", "home", 1.5);
    assert!(p.check_confidence().is_err());
}

#[test]
fn prediction_value_serde_is_tagged() {
    let json = serde_json::to_string(&PredictionValue::Number(46.4)).unwrap();
    assert_eq!(json, r#"{"kind":"number","value":46.4}"#);
    let back: PredictionValue = serde_json::from_str(&json).unwrap();
    assert_eq!(back, PredictionValue::Number(46.4));
}

#[test]
fn run_status_names_parse() {
    for status in [RunStatus::Open, RunStatus::Complete] {
        assert_eq!(RunStatus::parse(status.name()), Some(status));
    }
    assert_eq!(RunStatus::parse("abandoned"), None);
}

#[test]
fn precision_factor_shrinks_with_ema_error() {
    assert_eq!(Posterior::Ema { mu: 0.0, sigma: 1.0 }.precision_factor(10.0), 1.0);
    assert!((Posterior::Ema { mu: 10.0, sigma: 1.0 }.precision_factor(10.0) - 0.5).abs() < f64::EPSILON);
    assert_eq!(Posterior::Ema { mu: f64::NAN, sigma: 1.0 }.precision_factor(10.0), 1.0);
    assert_eq!(Posterior::uniform_beta().precision_factor(10.0), 1.0);
}
