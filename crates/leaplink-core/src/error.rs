//! leaplink 에러 타입.
//!
//! 전송 계층, 디코딩, 이벤트 버스, 드라이버 라이프사이클의 에러를 정의한다.
//! 각 에러는 발생 지점의 복구 정책이 다르다:
//!
//! - [`TransportError`] — 시작 시점이면 [`DriverError::Startup`], 수신 루프 중이면 루프 종료
//! - [`DecodeError`] — 해당 프레임만 폐기, 루프 계속
//! - [`UnknownTopicError`] — 호출자에게 동기 반환
//! - [`ListenerError`] — 리스너 단위로 격리, 진단 이벤트로만 보고

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정 로드/저장, 직렬화 등 주변 기능의 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 장치와의 전송 계층 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// 스트림이 닫힘 (장치 측 종료 포함)
    #[error("연결 종료됨")]
    Closed,

    /// 연결 수립 실패
    #[error("연결 실패: {0}")]
    Connect(String),

    /// 프로토콜 위반 또는 스트림 파손
    #[error("프로토콜 에러: {0}")]
    Protocol(String),

    /// 하위 소켓 I/O 실패
    #[error("전송 I/O 에러: {0}")]
    Io(String),
}

/// 페이로드 디코딩 실패.
///
/// 원본 페이로드와 파서 진단(행/열 위치 포함)을 함께 보관한다.
#[derive(Debug, Error)]
#[error("프레임 디코딩 실패 ({} bytes): {source}", .payload.len())]
pub struct DecodeError {
    /// 파싱에 실패한 원본 페이로드
    pub payload: Vec<u8>,
    /// 파서 진단
    #[source]
    pub source: serde_json::Error,
}

impl DecodeError {
    /// 사람이 읽을 수 있는 페이로드 미리보기 (최대 `max_chars`자)
    pub fn payload_preview(&self, max_chars: usize) -> String {
        String::from_utf8_lossy(&self.payload)
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// 선언되지 않은 토픽 요청
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("알 수 없는 토픽: {topic}")]
pub struct UnknownTopicError {
    /// 요청된 토픽 이름
    pub topic: String,
}

/// 리스너 콜백 실패.
///
/// 발행 자체의 실패가 아니며, 해당 리스너에만 국한된다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// 리스너가 에러를 반환함
    #[error("리스너 실패: {0}")]
    Failed(String),

    /// 리스너 내부 panic
    #[error("리스너 panic: {0}")]
    Panicked(String),

    /// 채널 구독자가 처리 속도를 따라가지 못해 이벤트 유실
    #[error("구독 채널 가득 참, 이벤트 유실")]
    Lagged,

    /// 채널 구독자가 수신 측을 닫음
    #[error("구독 채널 닫힘")]
    Disconnected,
}

/// 드라이버 라이프사이클 에러
#[derive(Debug, Error)]
pub enum DriverError {
    /// 제어 메시지 전송 실패 — 수신 루프는 시작되지 않음
    #[error("드라이버 시작 실패: {0}")]
    Startup(#[source] TransportError),

    /// 이미 종료된 드라이버 인스턴스
    #[error("이미 종료된 드라이버")]
    Terminated,

    /// 선언되지 않은 토픽
    #[error(transparent)]
    UnknownTopic(#[from] UnknownTopicError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn decode_error_keeps_payload_and_position() {
        let source = serde_json::from_slice::<serde_json::Value>(b"{\"hands\":").unwrap_err();
        let err = DecodeError {
            payload: b"{\"hands\":".to_vec(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("9 bytes"));
        assert!(msg.contains("line 1"));
        assert_eq!(err.payload_preview(4), "{\"ha");
    }

    #[test]
    fn startup_error_exposes_transport_source() {
        let err = DriverError::Startup(TransportError::Closed);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "연결 종료됨");
    }

    #[test]
    fn unknown_topic_converts_into_driver_error() {
        let err: DriverError = UnknownTopicError {
            topic: "finger".to_string(),
        }
        .into();
        assert_matches!(err, DriverError::UnknownTopic(ref e) if e.topic == "finger");
        assert_eq!(err.to_string(), "알 수 없는 토픽: finger");
    }
}
