//! 손가락/도구 모델.

use serde::{Deserialize, Serialize};

use super::{Matrix3, Vector3};

/// 터치 에뮬레이션 영역
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchZone {
    #[default]
    None,
    Hovering,
    Touching,
    #[serde(other)]
    Unknown,
}

/// 손가락 또는 도구
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pointable {
    pub id: i64,
    /// 소속 손 ID (도구는 -1)
    pub hand_id: i64,
    /// 손가락 종류 (0 = 엄지 … 4 = 새끼)
    #[serde(rename = "type")]
    pub finger_type: i32,
    pub direction: Vector3,
    pub length: f64,
    pub width: f64,
    pub tip_position: Vector3,
    pub tip_velocity: Vector3,
    pub stabilized_tip_position: Vector3,
    pub btip_position: Vector3,
    pub carp_position: Vector3,
    pub mcp_position: Vector3,
    pub pip_position: Vector3,
    pub dip_position: Vector3,
    /// 뼈 마디별 기저 행렬 (metacarpal → distal)
    pub bases: Vec<Matrix3>,
    pub extended: bool,
    pub tool: bool,
    pub touch_distance: f64,
    pub touch_zone: TouchZone,
    pub time_visible: f64,
}
