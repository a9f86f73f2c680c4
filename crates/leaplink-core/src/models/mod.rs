//! Leap Motion 도메인 모델.
//!
//! 장치가 WebSocket으로 보내는 JSON 프레임의 논리 구조를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현하며,
//! 누락된 필드는 기본값으로, 알 수 없는 필드는 무시한다.

pub mod control;
pub mod frame;
pub mod gesture;
pub mod hand;
pub mod pointable;

/// 3차원 벡터 (밀리미터 또는 단위 벡터), 장치 좌표계 `[x, y, z]`
pub type Vector3 = [f64; 3];

/// 3x3 기저 행렬 (행 단위)
pub type Matrix3 = [[f64; 3]; 3];

pub use control::ControlMessage;
pub use frame::{Frame, InteractionBox};
pub use gesture::{Gesture, GestureKind, GestureState};
pub use hand::{Hand, HandType};
pub use pointable::{Pointable, TouchZone};
