use conclave_core::category::{Category, CategoryRegistry, DataType, DifficultyTier};
use conclave_core::errors::{ConclaveError, ValidationError};
use conclave_core::models::PredictionValue;

#[test]
fn default_registry_spans_all_data_types() {
    let registry = CategoryRegistry::with_defaults();
    assert!(registry.len() >= 15);
    for data_type in [DataType::Categorical, DataType::Numeric, DataType::Percentage] {
        assert!(registry.iter().any(|c| c.data_type == data_type), "missing {data_type}");
    }
    assert!(registry.by_group("scoring").count() >= 3);
}

#[test]
fn categorical_validation() {
    let registry = CategoryRegistry::with_defaults();
    let winner = registry.require("winner").unwrap();

    winner.validate(&PredictionValue::from("home")).unwrap();
    assert!(matches!(
        winner.validate(&PredictionValue::from("draw")),
        Err(ValidationError::NotAChoice { .. })
    ));
    assert!(matches!(
        winner.validate(&PredictionValue::Number(1.0)),
        Err(ValidationError::WrongType { expected: DataType::Categorical, .. })
    ));
}

#[test]
fn numeric_validation_rejects_strings_and_out_of_range() {
    let registry = CategoryRegistry::with_defaults();
    let total = registry.require("total_points").unwrap();

    total.validate(&PredictionValue::Number(47.5)).unwrap();
    assert!(matches!(
        total.validate(&PredictionValue::from("47.5")),
        Err(ValidationError::WrongType { expected: DataType::Numeric, .. })
    ));
    assert!(matches!(
        total.validate(&PredictionValue::Number(-1.0)),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(matches!(
        total.validate(&PredictionValue::Number(f64::NAN)),
        Err(ValidationError::NonFinite { .. })
    ));
}

#[test]
fn percentage_outside_unit_interval_is_rejected() {
    let registry = CategoryRegistry::with_defaults();
    let p = registry.require("home_win_probability").unwrap();
    p.validate(&PredictionValue::Number(0.0)).unwrap();
    p.validate(&PredictionValue::Number(1.0)).unwrap();
    assert!(p.validate(&PredictionValue::Number(1.01)).is_err());
    assert!(p.validate(&PredictionValue::Number(-0.01)).is_err());
}

#[test]
fn flags_validate_against_true_false_choices() {
    let registry = CategoryRegistry::from_categories(vec![Category::categorical(
        "upset",
        "game_outcome",
        &["true", "false"],
        DifficultyTier::Hard,
    )])
    .unwrap();
    registry.require("upset").unwrap().validate(&PredictionValue::Flag(true)).unwrap();
}

#[test]
fn duplicate_ids_and_bad_definitions_are_rejected() {
    let dup = CategoryRegistry::from_categories(vec![
        Category::percentage("p", "g", DifficultyTier::Easy),
        Category::percentage("p", "g", DifficultyTier::Easy),
    ]);
    assert!(matches!(dup, Err(ConclaveError::Config(_))));

    let bad = CategoryRegistry::from_categories(vec![Category::numeric("n", "g", 5.0, 5.0, DifficultyTier::Easy)]);
    assert!(matches!(
        bad,
        Err(ConclaveError::Validation(ValidationError::InvalidDefinition { .. }))
    ));

    let weightless = CategoryRegistry::from_categories(vec![
        Category::percentage("p", "g", DifficultyTier::Easy).with_scoring_weight(0.0),
    ]);
    assert!(weightless.is_err());
}

#[test]
fn registry_from_toml() {
    let registry = CategoryRegistry::from_toml(
        r#"
        [[categories]]
        category_id = "winner"
        group = "game_outcome"
        data_type = "categorical"
        valid_domain = { kind = "choices", values = ["home", "away"] }
        scoring_weight = 2.0
        difficulty = "easy"

        [[categories]]
        category_id = "total_points"
        group = "scoring"
        data_type = "numeric"
        valid_domain = { kind = "range", min = 0.0, max = 150.0 }
        scoring_weight = 1.0
        difficulty = "moderate"
        "#,
    )
    .unwrap();
    assert_eq!(registry.len(), 2);
    assert!((registry.require("total_points").unwrap().domain_span() - 150.0).abs() < f64::EPSILON);
    assert!(matches!(registry.require("nope"), Err(ConclaveError::UnknownCategory(_))));
}

#[test]
fn json_payloads_map_to_prediction_values() {
    assert_eq!(PredictionValue::from_json(&serde_json::json!("home")), PredictionValue::from("home"));
    assert_eq!(PredictionValue::from_json(&serde_json::json!(44.5)), PredictionValue::Number(44.5));
    assert_eq!(PredictionValue::from_json(&serde_json::json!(true)), PredictionValue::Flag(true));
    assert!(matches!(
        PredictionValue::from_json(&serde_json::json!({"score": 3})),
        PredictionValue::Malformed(_)
    ));
}
