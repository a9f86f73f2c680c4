//! # leaplink-driver
//!
//! Leap Motion 프레임 수신 파이프라인.
//!
//! 장치 연결에서 페이로드를 받아 프레임으로 디코딩하고,
//! `message` / `hand` / `gesture` 토픽으로 구독자에게 팬아웃한다.
//!
//! ## 구조
//!
//! - [`driver`] — 드라이버 라이프사이클 (start / stop / halt)
//! - [`event_bus`] — 토픽 이벤트 버스 (리스너 격리, 동시 등록/해제)
//! - [`topic`] — 닫힌 토픽 집합과 버스 이벤트
//! - [`events`] — 드라이버 상태, 진단 이벤트
//!
//! ## 전달 정책
//!
//! 리스너는 수신 루프 태스크에서 동기로 호출된다. 느린 리스너는 다음 프레임 수신을
//! 늦추지만 장치 쪽으로 역압은 걸지 않는다. 루프와 분리가 필요하면
//! [`LeapMotionDriver::register_channel`]을 사용한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! let driver = LeapMotionDriver::new("leap", Arc::new(connection));
//! driver.register(Topic::Hand, |event| {
//!     if let Some(hand) = event.as_hand() {
//!         println!("hand {} at y={}", hand.id, hand.y());
//!     }
//!     Ok(())
//! })?;
//! driver.start().await?;
//! ```

pub mod driver;
pub mod event_bus;
pub mod events;
mod ingestion;
mod stats;
pub mod topic;

pub use driver::{DriverConfig, LeapMotionDriver};
pub use event_bus::{EventBus, SubscriptionId};
pub use events::{DriverEvent, DriverState};
pub use stats::DriverStats;
pub use topic::{BusEvent, Topic};
