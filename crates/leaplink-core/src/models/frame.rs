//! 프레임 모델.

use serde::{Deserialize, Serialize};

use super::{Gesture, Hand, Matrix3, Pointable, Vector3};

/// 장치 인터랙션 박스 (정규화 좌표 변환 기준)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionBox {
    pub center: Vector3,
    /// 폭/높이/깊이 (mm)
    pub size: Vector3,
}

/// 장치가 보낸 스냅샷 하나.
///
/// 디코딩 이후 변경되지 않는다. 메타데이터(`id`, `timestamp`, 모션 팩터)는
/// 해석하지 않고 그대로 전달한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Frame {
    pub id: u64,
    /// 장치 타임스탬프 (마이크로초)
    pub timestamp: u64,
    pub current_frame_rate: f64,
    pub hands: Vec<Hand>,
    pub gestures: Vec<Gesture>,
    pub pointables: Vec<Pointable>,
    pub interaction_box: InteractionBox,
    pub r: Matrix3,
    pub s: f64,
    pub t: Vector3,
}

impl Frame {
    /// 손/제스처가 하나도 없는 프레임인지
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty() && self.gestures.is_empty()
    }

    /// 추적 ID로 손 조회
    pub fn hand(&self, id: i64) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }

    /// 특정 손에 속한 손가락/도구
    pub fn pointables_for(&self, hand_id: i64) -> impl Iterator<Item = &Pointable> {
        self.pointables.iter().filter(move |p| p.hand_id == hand_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        serde_json::from_str(
            r#"{
                "id": 9001,
                "timestamp": 123456789,
                "currentFrameRate": 110.5,
                "hands": [{"id": 1, "type": "right"}, {"id": 2, "type": "left"}],
                "pointables": [
                    {"id": 10, "handId": 1, "type": 1, "extended": true},
                    {"id": 11, "handId": 1, "type": 2},
                    {"id": 20, "handId": 2, "type": 0}
                ],
                "interactionBox": {"center": [0.0, 200.0, 0.0], "size": [235.2, 235.2, 147.7]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn metadata_passes_through() {
        let frame = sample();
        assert_eq!(frame.id, 9001);
        assert_eq!(frame.timestamp, 123_456_789);
        assert_eq!(frame.current_frame_rate, 110.5);
        assert_eq!(frame.interaction_box.size[2], 147.7);
        assert!(frame.gestures.is_empty());
        assert!(!frame.is_empty());
    }

    #[test]
    fn hand_lookup_and_pointables() {
        let frame = sample();
        assert_eq!(frame.hand(2).map(|h| h.id), Some(2));
        assert!(frame.hand(3).is_none());

        let fingers: Vec<i64> = frame.pointables_for(1).map(|p| p.id).collect();
        assert_eq!(fingers, vec![10, 11]);
        assert!(frame.pointables[0].extended);
    }
}
