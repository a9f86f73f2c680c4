//! 로컬 WebSocket 서버를 장치 대역으로 사용하는 연결 테스트.

use assert_matches::assert_matches;
use futures::{SinkExt, StreamExt};
use leaplink_core::error::TransportError;
use leaplink_core::ports::connection::Connection;
use leaplink_network::WsConnection;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

/// 한 번의 연결을 받아 `frames`를 보내고, 클라이언트가 처음 보낸 메시지를 돌려주는 서버
async fn spawn_device(frames: Vec<Message>) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (first_tx, first_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

        if let Some(Ok(Message::Text(text))) = ws.next().await {
            let _ = first_tx.send(text.as_str().to_string());
        }
        for frame in frames {
            ws.send(frame).await.unwrap();
        }
        let _ = ws.close(None).await;
        // 클라이언트 종료 응답까지 소비
        while ws.next().await.is_some() {}
    });

    (format!("ws://{addr}/v6.json"), first_rx)
}

#[tokio::test]
async fn sends_control_and_receives_frames() {
    let (url, first_rx) = spawn_device(vec![
        Message::Text(r#"{"serviceVersion":"2.3.1","version":6}"#.to_string().into()),
        Message::Ping(vec![1, 2, 3].into()),
        Message::Text(r#"{"id":1,"hands":[{"id":5}]}"#.to_string().into()),
        Message::Binary(br#"{"id":2}"#.to_vec().into()),
    ])
    .await;

    let conn = WsConnection::connect(&url, Duration::from_secs(2))
        .await
        .unwrap();
    conn.send(br#"{"enableGestures":true}"#).await.unwrap();
    assert_eq!(first_rx.await.unwrap(), r#"{"enableGestures":true}"#);

    assert_eq!(
        conn.receive().await.unwrap(),
        br#"{"serviceVersion":"2.3.1","version":6}"#
    );
    // Ping은 건너뛰고 다음 데이터 메시지 반환
    assert_eq!(conn.receive().await.unwrap(), br#"{"id":1,"hands":[{"id":5}]}"#);
    assert_eq!(conn.receive().await.unwrap(), br#"{"id":2}"#);

    // 서버 종료 → Closed
    assert_matches!(conn.receive().await, Err(TransportError::Closed));
}

#[tokio::test]
async fn close_is_idempotent_and_blocks_send() {
    let (url, _first_rx) = spawn_device(vec![]).await;
    let conn = WsConnection::connect(&url, Duration::from_secs(2))
        .await
        .unwrap();

    conn.close().await.unwrap();
    conn.close().await.unwrap();
    assert!(conn.is_closed());
    assert_matches!(conn.send(b"{}").await, Err(TransportError::Closed));
}

#[tokio::test]
async fn connect_refused_is_connect_error() {
    // 바인딩 후 즉시 해제한 포트 → 연결 거부
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WsConnection::connect(&format!("ws://{addr}/v6.json"), Duration::from_secs(2)).await;
    assert_matches!(result, Err(TransportError::Connect(_)));
}
