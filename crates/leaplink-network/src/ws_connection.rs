//! WebSocket 장치 연결.
//!
//! `tokio-tungstenite` 기반 [`Connection`] 포트 구현.
//! 송신/수신 반쪽을 분리해 각각 잠그므로, 수신 대기 중에도 전송과 종료가 가능하다.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use leaplink_core::error::TransportError;
use leaplink_core::ports::connection::Connection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Leap Motion 서비스와의 WebSocket 연결
#[derive(Debug)]
pub struct WsConnection {
    url: String,
    write: Mutex<SplitSink<WsStream, Message>>,
    read: Mutex<SplitStream<WsStream>>,
    closed: AtomicBool,
}

impl WsConnection {
    /// WebSocket 연결 수립
    ///
    /// `timeout` 안에 핸드셰이크가 끝나지 않으면 [`TransportError::Connect`].
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| TransportError::Connect(format!("잘못된 URL {url}: {e}")))?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(TransportError::Connect(format!(
                "ws/wss 스킴만 지원: {url}"
            )));
        }

        info!("장치 WebSocket 연결: {url}");

        let (ws_stream, _) = tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url))
            .await
            .map_err(|_| {
                TransportError::Connect(format!("연결 타임아웃 ({}ms)", timeout.as_millis()))
            })?
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self::from_stream(url, ws_stream))
    }

    /// 이미 수립된 스트림으로 생성
    pub fn from_stream(url: &str, stream: WsStream) -> Self {
        let (write, read) = stream.split();
        Self {
            url: url.to_string(),
            write: Mutex::new(write),
            read: Mutex::new(read),
            closed: AtomicBool::new(false),
        }
    }

    /// 연결 대상 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `close`가 호출되었는지
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// tungstenite 에러를 전송 에러로 변환
fn map_ws_error(err: tungstenite::Error) -> TransportError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::Closed
        }
        tungstenite::Error::Io(e) => TransportError::Io(e.to_string()),
        other => TransportError::Protocol(other.to_string()),
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        // 장치 제어 프로토콜은 텍스트 JSON
        let message = match std::str::from_utf8(payload) {
            Ok(text) => Message::Text(text.to_string().into()),
            Err(_) => Message::Binary(payload.to_vec().into()),
        };
        let mut write = self.write.lock().await;
        write.send(message).await.map_err(map_ws_error)
    }

    async fn receive(&self) -> Result<Vec<u8>, TransportError> {
        let mut read = self.read.lock().await;
        loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().as_bytes().to_vec()),
                Some(Ok(Message::Binary(data))) => return Ok(data.to_vec()),
                Some(Ok(Message::Close(frame))) => {
                    debug!("장치가 연결 종료: {frame:?}");
                    return Err(TransportError::Closed);
                }
                Some(Ok(_)) => {} // Ping/Pong은 자동 처리
                Some(Err(e)) => return Err(map_ws_error(e)),
                None => return Err(TransportError::Closed),
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut write = self.write.lock().await;
        match write.close().await {
            Ok(()) => {
                debug!("WebSocket 종료: {}", self.url);
                Ok(())
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => {
                warn!("WebSocket 종료 실패: {e}");
                Err(map_ws_error(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn rejects_non_ws_url() {
        let result = WsConnection::connect("http://127.0.0.1:6437", Duration::from_secs(1)).await;
        assert_matches!(result, Err(TransportError::Connect(ref msg)) if msg.contains("스킴"));
    }

    #[test]
    fn rejects_malformed_url() {
        let result = tokio_test::block_on(WsConnection::connect("not a url", Duration::from_secs(1)));
        assert_matches!(result, Err(TransportError::Connect(_)));
    }

    #[test]
    fn closed_errors_map_to_closed() {
        assert_eq!(
            map_ws_error(tungstenite::Error::ConnectionClosed),
            TransportError::Closed
        );
        assert_eq!(
            map_ws_error(tungstenite::Error::AlreadyClosed),
            TransportError::Closed
        );
    }
}
