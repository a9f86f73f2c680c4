//! # leaplink-core
//!
//! Leap Motion 도메인 모델, 포트(trait) 정의, 프레임 디코더, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 프레임/손/제스처 데이터 구조체 (serde Serialize/Deserialize)
//! - [`decoder`] — 페이로드 → 프레임 변환 (순수 함수)
//! - [`ports`] — 장치 연결 포트 인터페이스 (async_trait)
//! - [`error`] — 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체
//! - [`config_manager`] — 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod decoder;
pub mod error;
pub mod models;
pub mod ports;
