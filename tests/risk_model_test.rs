//! Tests for the risk coefficient and discount model

use risk_roster::risk::{parse_csv_vector, CoefficientKind, DiscountKind, RiskModel};
use risk_roster::{RiskModelConfig, RiskRosterError};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_uniform_coefficients() {
    let mut model = RiskModel::new();
    model
        .set_coefficients(CoefficientKind::Uniform, None)
        .unwrap();
    let coefficients = model.coefficients(4).unwrap();
    assert_eq!(coefficients, vec![0.25; 4]);
    assert!(model.coefficients(0).unwrap().is_empty());
}

#[test]
fn test_linear_coefficients() {
    let mut model = RiskModel::new();
    model
        .set_coefficients(CoefficientKind::Linear, None)
        .unwrap();
    let coefficients = model.coefficients(3).unwrap();
    assert_eq!(coefficients.len(), 3);
    assert_close(coefficients[0], 1.0 / 6.0);
    assert_close(coefficients[1], 2.0 / 6.0);
    assert_close(coefficients[2], 3.0 / 6.0);
    assert_close(coefficients.iter().sum::<f64>(), 1.0);
}

#[test]
fn test_custom_coefficient_extension_law() {
    let mut model = RiskModel::new();
    model
        .set_coefficients(CoefficientKind::Custom, Some(vec![0.5, 0.3]))
        .unwrap();
    // Shorter than requested: extend by repeating the last stored entry,
    // without re-normalization.
    assert_eq!(
        model.coefficients(5).unwrap(),
        vec![0.5, 0.3, 0.3, 0.3, 0.3]
    );
    // Longer than requested: truncate.
    assert_eq!(model.coefficients(1).unwrap(), vec![0.5]);
    // Exact length passes through.
    assert_eq!(model.coefficients(2).unwrap(), vec![0.5, 0.3]);
}

#[test]
fn test_unconfigured_model_errors() {
    let model = RiskModel::new();
    assert!(matches!(
        model.coefficients(3),
        Err(RiskRosterError::Configuration { .. })
    ));
    assert!(matches!(
        model.discount(5),
        Err(RiskRosterError::Configuration { .. })
    ));

    let mut model = RiskModel::new();
    assert!(model
        .set_coefficients(CoefficientKind::Custom, None)
        .is_err());
    assert!(model
        .set_discount(DiscountKind::Sigmoid, vec![1.0, 2.0, 3.0])
        .is_err());
}

#[test]
fn test_custom_discount_saturation() {
    let mut model = RiskModel::new();
    let vector: Vec<f64> = (0..10).map(|day| day as f64 / 10.0).collect();
    model.set_discount(DiscountKind::Custom, vector).unwrap();

    // Negative elapsed time saturates to zero risk.
    assert_close(model.discount(-1).unwrap(), 0.0);
    // In-range lookups are direct.
    assert_close(model.discount(0).unwrap(), 0.0);
    assert_close(model.discount(3).unwrap(), 0.3);
    // Index 10 is out of bounds for a length-10 vector: fully decayed.
    assert_close(model.discount(10).unwrap(), 1.0);
    assert_close(model.discount(365).unwrap(), 1.0);
}

#[test]
fn test_sigmoid_discount() {
    let mut model = RiskModel::new();
    model
        .set_discount(DiscountKind::Sigmoid, vec![1.0, 5.0])
        .unwrap();
    // The sigmoid crosses 0.5 at the shift parameter.
    assert_close(model.discount(5).unwrap(), 0.5);
    assert!(model.discount(10).unwrap() > model.discount(5).unwrap());
    assert!(model.discount(0).unwrap() < 0.5);
    let value = model.discount(1000).unwrap();
    assert!(value > 0.0 && value <= 1.0);
}

#[test]
fn test_bulk_discounts() {
    let mut model = RiskModel::new();
    model
        .set_discount(DiscountKind::Custom, vec![0.0, 0.5])
        .unwrap();
    let values = model.discounts(0..4).unwrap();
    assert_eq!(values, vec![0.0, 0.5, 1.0, 1.0]);
}

#[test]
fn test_config_round_trip() {
    let mut model = RiskModel::new();
    model
        .set_coefficients(CoefficientKind::Custom, Some(vec![0.2, 0.8]))
        .unwrap();
    model
        .set_discount(DiscountKind::Sigmoid, vec![0.5, 7.0])
        .unwrap();

    let config = model.to_config();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: RiskModelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let restored = RiskModel::from_config(&parsed).unwrap();
    assert_eq!(restored.coefficients(3).unwrap(), vec![0.2, 0.8, 0.8]);
    assert_close(restored.discount(7).unwrap(), 0.5);
}

#[test]
fn test_config_rejects_unknown_kind() {
    let config = RiskModelConfig {
        coeff_kind: Some("quadratic".to_string()),
        ..RiskModelConfig::default()
    };
    assert!(matches!(
        RiskModel::from_config(&config),
        Err(RiskRosterError::Configuration { .. })
    ));
}

#[test]
fn test_parse_csv_vector() {
    assert_eq!(
        parse_csv_vector("1.0, 2.5,,abc,3"),
        vec![1.0, 2.5, 0.0, 3.0]
    );
    assert!(parse_csv_vector("").is_empty());
}
