//! 애플리케이션 설정 구조체.
//!
//! 장치 연결 주소, 드라이버 이름, 구독 채널 용량 등 런타임 설정을 정의한다.
//! [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 장치 연결 설정
    #[serde(default)]
    pub device: DeviceConfig,
    /// 드라이버 설정
    #[serde(default)]
    pub driver: DriverSettings,
}

// ============================================================
// 장치 연결 설정
// ============================================================

/// 장치 연결 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// WebSocket 엔드포인트 (예: "ws://127.0.0.1:6437/v6.json")
    #[serde(default = "default_device_url")]
    pub url: String,
    /// 시작 시 제스처 인식 활성화
    #[serde(default = "default_true")]
    pub enable_gestures: bool,
    /// 연결 타임아웃 (밀리초)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            url: default_device_url(),
            enable_gestures: true,
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

// ============================================================
// 드라이버 설정
// ============================================================

/// 드라이버 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSettings {
    /// 드라이버 이름 (로그 식별자)
    #[serde(default = "default_driver_name")]
    pub name: String,
    /// 채널 구독자별 버퍼 크기
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// 드라이버 이벤트(진단) 브로드캐스트 버퍼 크기
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            name: default_driver_name(),
            channel_capacity: default_channel_capacity(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 연결 타임아웃을 Duration으로 반환
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.device.connect_timeout_ms)
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = url::Url::parse(&self.device.url).map_err(|e| CoreError::Validation {
            field: "device.url".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(CoreError::Validation {
                field: "device.url".to_string(),
                message: format!("ws/wss 스킴만 지원: {}", url.scheme()),
            });
        }
        if self.device.connect_timeout_ms == 0 {
            return Err(CoreError::Validation {
                field: "device.connect_timeout_ms".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.driver.channel_capacity == 0 {
            return Err(CoreError::Validation {
                field: "driver.channel_capacity".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.driver.event_capacity == 0 {
            return Err(CoreError::Validation {
                field: "driver.event_capacity".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_device_url() -> String {
    "ws://127.0.0.1:6437/v6.json".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_driver_name() -> String {
    "leap".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

fn default_event_capacity() -> usize {
    128
}
