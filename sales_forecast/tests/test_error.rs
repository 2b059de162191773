use sales_forecast::ForecastError;
use std::io;

#[test]
fn test_error_display() {
    let err = ForecastError::InvalidInput("series is empty".to_string());
    assert_eq!(err.to_string(), "Invalid input: series is empty");

    let err = ForecastError::UnsupportedModel("Model type 'lstm' not supported".to_string());
    assert_eq!(
        err.to_string(),
        "Unsupported model: Model type 'lstm' not supported"
    );

    let err = ForecastError::ConfigError("tolerance must be positive".to_string());
    assert_eq!(err.to_string(), "Configuration error: tolerance must be positive");
}

#[test]
fn test_invalid_input_class() {
    assert!(ForecastError::InvalidInput(String::new()).is_invalid_input());
    assert!(ForecastError::UnsupportedGranularity(String::new()).is_invalid_input());
    assert!(!ForecastError::UnsupportedModel(String::new()).is_invalid_input());
    assert!(!ForecastError::ConfigError(String::new()).is_invalid_input());
}

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: ForecastError = io_error.into();
    assert!(matches!(err, ForecastError::IoError(_)));

    let math_error = forecast_math::MathError::InsufficientData("empty".to_string());
    let err: ForecastError = math_error.into();
    assert!(matches!(err, ForecastError::MathError(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ForecastError = json_error.into();
    assert!(matches!(err, ForecastError::JsonError(_)));
}
