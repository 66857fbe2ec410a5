#![allow(non_snake_case)]

use super::*;
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct TestArgs {
    name: String,
}

// MethodCall tests

#[test]
fn MethodCall___new___has_no_id() {
    let call = MethodCall::new("convertToGrayscale", json!({"imagePath": "/a.jpg"}));

    assert_eq!(call.method, "convertToGrayscale");
    assert!(call.id.is_none());
}

#[test]
fn MethodCall___serialize_without_id___omits_field() {
    let call = MethodCall::new("setMinimumLogLevel", json!({"minimumLogLevel": "W"}));

    let value = serde_json::to_value(&call).unwrap();

    assert!(value.get("id").is_none());
}

#[test]
fn MethodCall___with_id___serializes_id() {
    let call = MethodCall::new("convertToGrayscale", json!({})).with_id(7);

    let value = serde_json::to_value(&call).unwrap();

    assert_eq!(value["id"], 7);
}

#[test]
fn MethodCall___from_typed___args_as_recovers_value() {
    let call = MethodCall::from_typed(
        "test",
        &TestArgs {
            name: "gray".to_string(),
        },
    )
    .unwrap();

    let args: TestArgs = call.args_as().unwrap();

    assert_eq!(args.name, "gray");
}

#[test]
fn MethodCall___deserialize_without_args___defaults_to_null() {
    let call: MethodCall = serde_json::from_str(r#"{"method": "onLogMessage"}"#).unwrap();

    assert_eq!(call.args, serde_json::Value::Null);
}

// TransportError tests

#[test]
fn TransportError___to_sdk_error___uses_structured_details() {
    let err = TransportError::new("CONVERSION", Some("outer".into()))
        .with_details(json!({"error": {"code": 1103, "message": "decoder failed"}}));

    let sdk = err.to_sdk_error();

    assert_eq!(sdk, SdkError::new(1103, "decoder failed"));
}

#[test]
fn TransportError___to_sdk_error___unparsable_details_fall_back_to_message() {
    let err = TransportError::new("CONVERSION", Some("engine crashed".into()))
        .with_details(json!({"unexpected": true}));

    let sdk = err.to_sdk_error();

    assert_eq!(sdk.code, 9001);
    assert_eq!(sdk.message, "engine crashed");
}

#[test]
fn TransportError___to_sdk_error___no_message_uses_fixed_fallback() {
    let err = TransportError::new("CONVERSION", None);

    let sdk: SdkError = err.into();

    assert_eq!(sdk.code, 9001);
    assert_eq!(sdk.message, "Unknown error");
}

// MethodReply tests

#[test]
fn MethodReply___success___into_outcome_yields_result() {
    let reply = MethodReply::success(json!({"resultPath": "/tmp/out.jpg"})).with_id(3);

    assert!(reply.is_success());
    assert_eq!(
        reply.into_outcome(),
        ReplyOutcome::Success(json!({"resultPath": "/tmp/out.jpg"}))
    );
}

#[test]
fn MethodReply___error___into_outcome_yields_error() {
    let reply = MethodReply::error(TransportError::new("E", Some("boom".into())));

    assert!(!reply.is_success());
    assert!(matches!(reply.into_outcome(), ReplyOutcome::Error(e) if e.code == "E"));
}

#[test]
fn MethodReply___error_status_without_body___still_error() {
    let reply: MethodReply = serde_json::from_str(r#"{"status": "error", "id": 1}"#).unwrap();

    assert!(matches!(reply.into_outcome(), ReplyOutcome::Error(_)));
}

#[test]
fn MethodReply___success_without_result___yields_null() {
    let reply: MethodReply = serde_json::from_str(r#"{"status": "success"}"#).unwrap();

    assert_eq!(
        reply.into_outcome(),
        ReplyOutcome::Success(serde_json::Value::Null)
    );
}

#[test]
fn MethodReply___serialize___uses_snake_case_status() {
    let value = serde_json::to_value(MethodReply::success(json!(1))).unwrap();

    assert_eq!(value["status"], "success");
    assert!(value.get("error").is_none());
}
