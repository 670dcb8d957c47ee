use super::*;

#[test]
fn test_closed_error() {
    let err = ChannelError::Closed;
    assert!(err.to_string().contains("closed"));
}

#[test]
fn test_id_space_exhausted_error() {
    let err = ChannelError::IdSpaceExhausted { max_id: 1024 };
    let display = err.to_string();
    assert!(display.contains("1024"));
    assert!(display.contains("in flight"));
}

#[test]
fn test_timeout_error() {
    let err = ChannelError::Timeout {
        id: 7,
        timeout_ms: 500,
    };
    let display = err.to_string();
    assert!(display.contains("Request 7"));
    assert!(display.contains("500ms"));
}

#[test]
fn test_serialization_error_from() {
    let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
    let err = ChannelError::from(json_err);
    assert!(err.to_string().contains("Serialization"));
}

#[test]
fn test_classifier_error_is_transparent() {
    let err = ChannelError::from(ClassifierError::ModelUnavailable("offline".to_string()));
    assert_eq!(err.to_string(), "Model unavailable: offline");
    assert!(err.is_model_unavailable());
}

#[test]
fn test_other_errors_are_not_model_unavailable() {
    assert!(!ChannelError::Closed.is_model_unavailable());
    let invalid = ChannelError::from(ClassifierError::InvalidOutput {
        expected: 1,
        actual: 0,
    });
    assert!(!invalid.is_model_unavailable());
}
