//! 장치 연결 포트.
//!
//! 구현: `leaplink-network` crate (tokio-tungstenite)

use async_trait::async_trait;

use crate::error::TransportError;

/// 장치와의 양방향 스트림.
///
/// 메시지 경계는 구현체가 보장한다 (페이로드 하나 = 논리 메시지 하나).
/// `receive`는 취소 안전해야 한다: 진행 중인 future를 drop해도
/// 이후 `close` 호출이나 다른 수신이 깨지지 않아야 한다.
#[async_trait]
pub trait Connection: Send + Sync {
    /// 페이로드 전송
    async fn send(&self, payload: &[u8]) -> Result<(), TransportError>;

    /// 다음 페이로드 수신 (도착할 때까지 대기)
    ///
    /// 스트림이 닫히거나 깨지면 에러를 반환한다.
    async fn receive(&self) -> Result<Vec<u8>, TransportError>;

    /// 연결 종료. 여러 번 호출해도 안전하다.
    async fn close(&self) -> Result<(), TransportError>;
}
