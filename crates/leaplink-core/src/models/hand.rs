//! 손 모델.

use serde::{Deserialize, Serialize};

use super::{Matrix3, Vector3};

/// 손 종류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandType {
    Left,
    Right,
    /// 구버전 프로토콜 또는 알 수 없는 값
    #[default]
    #[serde(other)]
    Unknown,
}

/// 프레임 안에서 추적 중인 손 하나
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hand {
    /// 추적 ID (손이 시야에 있는 동안 유지)
    pub id: i64,
    #[serde(rename = "type")]
    pub hand_type: HandType,
    /// 손바닥에서 손가락 방향 단위 벡터
    pub direction: Vector3,
    pub palm_normal: Vector3,
    /// 손바닥 중심 좌표 (mm)
    pub palm_position: Vector3,
    /// 손바닥 속도 (mm/s)
    pub palm_velocity: Vector3,
    pub palm_width: f64,
    pub stabilized_palm_position: Vector3,
    pub sphere_center: Vector3,
    pub sphere_radius: f64,
    /// 시야 체류 시간 (초)
    pub time_visible: f64,
    pub grab_strength: f64,
    pub pinch_strength: f64,
    pub confidence: f64,
    pub arm_basis: Matrix3,
    pub arm_width: f64,
    pub elbow: Vector3,
    pub wrist: Vector3,
    // 이전 프레임 대비 모션 팩터
    pub r: Matrix3,
    pub s: f64,
    pub t: Vector3,
}

impl Hand {
    /// 손바닥 X 좌표
    pub fn x(&self) -> f64 {
        self.palm_position[0]
    }

    /// 손바닥 Y 좌표 (장치 위 높이)
    pub fn y(&self) -> f64 {
        self.palm_position[1]
    }

    /// 손바닥 Z 좌표
    pub fn z(&self) -> f64 {
        self.palm_position[2]
    }
}
