//! 장치 제어 메시지.

use serde::{Deserialize, Serialize};

/// 시작 시 한 번 전송하는 제어 메시지.
///
/// 직렬화 결과: `{"enableGestures":true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMessage {
    /// 제스처 인식 활성화 여부
    pub enable_gestures: bool,
}

impl ControlMessage {
    /// 제스처 인식 활성화 메시지
    pub fn enable_gestures() -> Self {
        Self {
            enable_gestures: true,
        }
    }
}

impl Default for ControlMessage {
    fn default() -> Self {
        Self::enable_gestures()
    }
}
