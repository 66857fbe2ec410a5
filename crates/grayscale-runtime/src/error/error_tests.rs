#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case(ChannelError::UnknownChannel("a/image".into()), 2001 ; "unknown channel")]
#[test_case(ChannelError::Closed("a/image".into()), 2002 ; "closed")]
#[test_case(ChannelError::Timeout(Duration::from_secs(1)), 2004 ; "timeout")]
#[test_case(ChannelError::Send("gone".into()), 1002 ; "send failure")]
#[test_case(ChannelError::Codec(CodecError::Deserialization("eof".into())), 1002 ; "codec failure")]
fn ChannelError___into_sdk_error___maps_code(err: ChannelError, expected: i64) {
    let sdk: SdkError = err.into();

    assert_eq!(sdk.code, expected);
}

#[test]
fn ChannelError___timeout___keeps_duration_in_message() {
    let sdk: SdkError = ChannelError::Timeout(Duration::from_millis(250)).into();

    assert!(sdk.message.contains("250ms"));
}

#[test]
fn ChannelError___closed___uses_default_message() {
    let sdk: SdkError = ChannelError::Closed("a/image".into()).into();

    assert_eq!(sdk.message, ErrorCode::ChannelClosed.default_message());
}
