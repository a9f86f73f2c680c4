//! 프레임 디코더.
//!
//! 수신한 페이로드 하나를 [`Frame`]으로 변환하는 순수 함수.
//! 공유 상태가 없으므로 어느 스레드에서 호출해도 안전하다.

use serde::de::{self, Unexpected};
use serde_json::Value;

use crate::error::DecodeError;
use crate::models::{ControlMessage, Frame};

/// 페이로드 하나를 프레임으로 디코딩.
///
/// 손/제스처 필드가 없는 유효한 JSON 객체(예: 장치의 최초 `{"version":6}`
/// 인사 메시지)는 빈 프레임이 된다. JSON 문법 오류나 스키마 불일치는
/// 원본 페이로드를 담은 [`DecodeError`]를 반환한다. 최상위 값은 JSON 객체여야 하며,
/// 배열은 필드 순서대로 채워지지 않고 스키마 불일치로 처리된다.
pub fn decode(payload: &[u8]) -> Result<Frame, DecodeError> {
    let result = if starts_with_object(payload) {
        serde_json::from_slice(payload)
    } else {
        Err(not_an_object(payload))
    };
    result.map_err(|source| DecodeError {
        payload: payload.to_vec(),
        source,
    })
}

fn starts_with_object(payload: &[u8]) -> bool {
    payload
        .iter()
        .find(|&&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        == Some(&b'{')
}

/// 객체가 아닌 페이로드의 진단 (JSON 문법 오류면 그 에러 그대로)
fn not_an_object(payload: &[u8]) -> serde_json::Error {
    match serde_json::from_slice::<Value>(payload) {
        Ok(value) => de::Error::invalid_type(unexpected(&value), &"JSON 객체"),
        Err(e) => e,
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Unexpected::Unsigned(u)
            } else if let Some(i) = n.as_i64() {
                Unexpected::Signed(i)
            } else {
                Unexpected::Float(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Unexpected::Str(s.as_str()),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// 제어 메시지를 장치 프로토콜 형식(JSON)으로 인코딩
pub fn encode_control(message: &ControlMessage) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GestureKind, HandType};
    use assert_matches::assert_matches;

    #[test]
    fn empty_object_is_empty_frame() {
        let frame = decode(b"{}").unwrap();
        assert!(frame.hands.is_empty());
        assert!(frame.gestures.is_empty());
    }

    #[test]
    fn version_greeting_is_empty_frame() {
        let frame = decode(br#"{"serviceVersion":"2.3.1+33747","version":6}"#).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.id, 0);
    }

    #[test]
    fn decodes_hands_and_gestures_in_order() {
        let payload = br#"{
            "id": 77,
            "hands": [{"id": 100, "type": "left"}, {"id": 200, "type": "right"}],
            "gestures": [{"id": 1, "type": "circle"}, {"id": 2, "type": "keyTap"}]
        }"#;
        let frame = decode(payload).unwrap();
        let hand_ids: Vec<i64> = frame.hands.iter().map(|h| h.id).collect();
        assert_eq!(hand_ids, vec![100, 200]);
        assert_eq!(frame.hands[0].hand_type, HandType::Left);
        assert_eq!(frame.gestures[1].kind, GestureKind::KeyTap);
    }

    #[test]
    fn syntax_error_keeps_payload() {
        let err = decode(b"{\"hands\": [").unwrap_err();
        assert_eq!(err.payload, b"{\"hands\": [");
        assert!(err.source.is_eof());
    }

    #[test]
    fn schema_mismatch_is_error() {
        let err = decode(br#"{"hands": 5}"#).unwrap_err();
        assert!(err.source.is_data());
    }

    #[test]
    fn non_object_json_is_error() {
        let err = decode(b"[]").unwrap_err();
        assert!(err.source.is_data());
        assert_eq!(err.payload, b"[]");

        assert_matches!(decode(b"[7,9]"), Err(DecodeError { .. }));
        assert_matches!(decode(b" 42"), Err(DecodeError { .. }));
        assert_matches!(decode(br#""frame""#), Err(DecodeError { .. }));
        assert_matches!(decode(b"null"), Err(DecodeError { .. }));
        // 앞뒤 공백이 있는 객체는 정상
        assert!(decode(b"\n  {\"id\": 4} ").is_ok());
    }

    #[test]
    fn non_json_is_error() {
        assert_matches!(decode(b"not json"), Err(DecodeError { .. }));
        assert_matches!(decode(b""), Err(DecodeError { .. }));
    }

    #[test]
    fn control_message_wire_format() {
        let bytes = encode_control(&ControlMessage::enable_gestures()).unwrap();
        assert_eq!(bytes, br#"{"enableGestures":true}"#);

        let off = encode_control(&ControlMessage {
            enable_gestures: false,
        })
        .unwrap();
        assert_eq!(off, br#"{"enableGestures":false}"#);
    }
}
