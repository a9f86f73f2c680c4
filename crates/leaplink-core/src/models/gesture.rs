//! 제스처 모델.

use serde::{Deserialize, Serialize};

use super::Vector3;

/// 제스처 종류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    Circle,
    Swipe,
    KeyTap,
    ScreenTap,
    #[default]
    #[serde(other)]
    Unknown,
}

/// 제스처 진행 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    Start,
    Update,
    Stop,
    #[default]
    #[serde(other)]
    Unknown,
}

/// 프레임 안에서 인식된 제스처 하나.
///
/// 종류에 따라 채워지는 필드가 다르다 (circle: center/normal/radius/progress,
/// swipe: direction/speed/start_position, tap: position/direction).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gesture {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: GestureKind,
    pub state: GestureState,
    /// 지속 시간 (마이크로초)
    pub duration: i64,
    pub hand_ids: Vec<i64>,
    pub pointable_ids: Vec<i64>,
    pub center: Vector3,
    pub direction: Vector3,
    pub normal: Vector3,
    pub position: Vector3,
    pub start_position: Vector3,
    pub progress: f64,
    pub radius: f64,
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_swipe() {
        let gesture: Gesture = serde_json::from_str(
            r#"{
                "id": 42, "type": "swipe", "state": "update",
                "duration": 150000, "handIds": [5], "pointableIds": [51],
                "direction": [1.0, 0.0, 0.0], "speed": 800.5,
                "startPosition": [-50.0, 200.0, 0.0]
            }"#,
        )
        .unwrap();
        assert_eq!(gesture.kind, GestureKind::Swipe);
        assert_eq!(gesture.state, GestureState::Update);
        assert_eq!(gesture.hand_ids, vec![5]);
        assert_eq!(gesture.start_position, [-50.0, 200.0, 0.0]);
    }

    #[test]
    fn tap_kinds_use_camel_case() {
        let key: Gesture = serde_json::from_str(r#"{"type": "keyTap"}"#).unwrap();
        let screen: Gesture = serde_json::from_str(r#"{"type": "screenTap"}"#).unwrap();
        let other: Gesture = serde_json::from_str(r#"{"type": "wave", "state": "?"}"#).unwrap();
        assert_eq!(key.kind, GestureKind::KeyTap);
        assert_eq!(screen.kind, GestureKind::ScreenTap);
        assert_eq!(other.kind, GestureKind::Unknown);
        assert_eq!(other.state, GestureState::Unknown);
    }
}
