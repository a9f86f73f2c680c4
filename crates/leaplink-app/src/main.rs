//! # leaplink-app
//!
//! leaplink 바이너리 진입점.
//! 설정 로드, 장치 연결, 드라이버 와이어링, 라이프사이클 관리.

mod lifecycle;
mod listeners;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use leaplink_core::config::AppConfig;
use leaplink_core::config_manager::ConfigManager;
use leaplink_core::ports::connection::Connection;
use leaplink_driver::{DriverConfig, LeapMotionDriver, Topic};
use leaplink_network::WsConnection;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// Leap Motion 텔레메트리 어댑터
///
/// 장치 WebSocket 서비스에서 프레임을 받아 손/제스처 이벤트로 발행한다.
#[derive(Parser, Debug)]
#[command(name = "leaplink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 장치 WebSocket URL (기본: ws://127.0.0.1:6437/v6.json)
    #[arg(long, short = 'u')]
    url: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 드라이버 이름 (로그 접두어)
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// 제스처 인식 비활성화
    #[arg(long)]
    no_gestures: bool,

    /// 수신 프레임을 JSON 한 줄씩 표준 출력으로 출력
    #[arg(long, short = 'p')]
    print_frames: bool,
}

/// 설정 로드 (파일 → CLI 오버라이드 → 검증)
fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => Some(
            ConfigManager::with_path(path.clone())
                .with_context(|| format!("설정 파일 로드 실패: {}", path.display()))?,
        ),
        None => match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                warn!("설정 관리자 생성 실패, 기본 설정 사용: {e}");
                None
            }
        },
    };

    let mut config = match &manager {
        Some(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        None => AppConfig::default_config(),
    };

    apply_overrides(&mut config, args);
    config
        .validate()
        .map_err(|e| anyhow!("설정 검증 실패: {e}"))?;
    Ok(config)
}

/// CLI 인자로 설정 오버라이드 (파일에는 저장하지 않음)
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(ref url) = args.url {
        config.device.url = url.clone();
    }
    if let Some(ref name) = args.name {
        config.driver.name = name.clone();
    }
    if args.no_gestures {
        config.device.enable_gestures = false;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화 (RUST_LOG 우선)
    let log_filter = format!(
        "leaplink={lvl},leaplink_app={lvl},leaplink_core={lvl},leaplink_network={lvl},leaplink_driver={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config = load_config(&args)?;
    info!(
        "leaplink 시작: {} (gestures={})",
        config.device.url, config.device.enable_gestures
    );

    let connection = WsConnection::connect(&config.device.url, config.connect_timeout())
        .await
        .map_err(|e| anyhow!("장치 연결 실패 ({}): {e}", config.device.url))?;
    let connection: Arc<dyn Connection> = Arc::new(connection);

    let driver = Arc::new(LeapMotionDriver::with_config(
        &config.driver.name,
        connection,
        DriverConfig::from(&config),
    ));

    let diagnostics = listeners::spawn_diagnostics(driver.subscribe_events());
    listeners::attach_logging(&driver)?;
    let printer = if args.print_frames {
        let (_, frames) = driver.register_channel(Topic::Message, config.driver.channel_capacity)?;
        Some(listeners::spawn_frame_printer(frames))
    } else {
        None
    };

    // 시작 도중의 시그널도 놓치지 않도록 start 전에 등록
    let lifecycle = Arc::new(LifecycleManager::new());
    let signals = {
        let lifecycle = Arc::clone(&lifecycle);
        tokio::spawn(async move {
            if let Err(e) = lifecycle.wait_for_signal().await {
                error!("시그널 핸들러 등록 실패: {e}");
                lifecycle.shutdown();
            }
        })
    };
    let stopper = {
        let driver = Arc::clone(&driver);
        let mut shutdown_rx = lifecycle.subscribe();
        tokio::spawn(async move {
            if shutdown_rx.wait_for(|requested| *requested).await.is_ok() {
                driver.stop();
            }
        })
    };

    driver.start().await.context("드라이버 시작 실패")?;
    driver.stopped().await;
    if !lifecycle.is_shutting_down() {
        warn!("드라이버가 스스로 중지됨");
        lifecycle.shutdown();
    }
    signals.abort();
    let _ = stopper.await;

    info!("종료 중...");
    driver.halt().await;

    let stats = driver.stats();
    info!(
        "수신 {} / 디코딩 {} / 폐기 {} / 발행 {} / 리스너 실패 {}",
        stats.frames_received,
        stats.frames_decoded,
        stats.frames_dropped,
        stats.events_published,
        stats.listener_failures
    );

    // 버스가 사라져야 구독 채널과 진단 채널이 닫힘
    drop(driver);
    if let Some(printer) = printer {
        let _ = printer.await;
    }
    let _ = diagnostics.await;

    info!("leaplink 종료");
    Ok(())
}
