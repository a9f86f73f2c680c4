//! # leaplink-network
//!
//! Leap Motion 서비스 WebSocket 어댑터.
//! [`leaplink_core::ports::connection::Connection`] 포트를
//! `tokio-tungstenite`로 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use leaplink_network::ws_connection::WsConnection;
//!
//! let conn = WsConnection::connect("ws://127.0.0.1:6437/v6.json", Duration::from_secs(5)).await?;
//! ```

pub mod ws_connection;

pub use ws_connection::WsConnection;
