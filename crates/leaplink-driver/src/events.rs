//! 드라이버 상태와 진단 이벤트.

use leaplink_core::error::{ListenerError, TransportError};
use std::fmt;

use crate::event_bus::SubscriptionId;
use crate::topic::Topic;

/// 드라이버 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// 생성됨, 아직 시작 전
    Idle,
    /// 수신 루프 동작 중
    Running,
    /// 종료됨 (요청 또는 전송 실패)
    Stopped,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Idle => write!(f, "Idle"),
            DriverState::Running => write!(f, "Running"),
            DriverState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// 소유 프로세스에 비동기로 알리는 드라이버 이벤트.
///
/// 호출자가 기다리고 있지 않은 실패(수신 루프의 전송 에러, 리스너 실패,
/// 폐기된 프레임)는 모두 이 이벤트로 보고된다.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// 상태 전이
    StateChanged(DriverState),
    /// 디코딩 실패로 프레임 폐기
    FrameDropped {
        /// 파서 진단
        reason: String,
        /// 폐기된 페이로드 크기
        payload_len: usize,
    },
    /// 리스너 콜백 실패 (다른 리스너 전달에는 영향 없음)
    ListenerFailed {
        topic: Topic,
        subscription: SubscriptionId,
        error: ListenerError,
    },
    /// 수신 중 전송 실패 — 루프 종료
    TransportFailed(TransportError),
}
