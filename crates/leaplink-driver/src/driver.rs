//! Leap Motion 드라이버.
//!
//! 연결, 이벤트 버스, 수신 루프를 하나의 이름 아래 묶고
//! 소유 프로세스에 시작/종료와 토픽 구독을 노출한다.
//!
//! 상태 전이:
//!
//! ```text
//! Idle ──start()──▶ Running ──stop() / 수신 실패──▶ Stopped
//!  ▲ │                 │ start(): no-op             │ stop(): no-op
//!  └─┘ 제어 메시지      │                            │ start(): Terminated
//!      전송 실패
//! ```
//!
//! 제어 메시지 전송 중(`Idle`)에 들어온 stop은 보류되었다가 전송이 끝나는 즉시
//! 적용된다. 이때 수신 루프는 띄우지 않고 바로 `Stopped`로 전이한다.

use leaplink_core::config::AppConfig;
use leaplink_core::decoder;
use leaplink_core::error::{DriverError, ListenerError, TransportError};
use leaplink_core::models::ControlMessage;
use leaplink_core::ports::connection::Connection;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::event_bus::{EventBus, SubscriptionId};
use crate::events::{DriverEvent, DriverState};
use crate::ingestion::IngestionLoop;
use crate::stats::{DriverStats, IngestionCounters};
use crate::topic::{BusEvent, Topic};

/// 드라이버 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// 시작 시 제어 메시지의 제스처 인식 플래그
    pub enable_gestures: bool,
    /// 드라이버 이벤트 브로드캐스트 버퍼 크기
    pub event_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            enable_gestures: true,
            event_capacity: 128,
        }
    }
}

impl From<&AppConfig> for DriverConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            enable_gestures: config.device.enable_gestures,
            event_capacity: config.driver.event_capacity,
        }
    }
}

/// 시작 진행 상황 (상태 전이와 같은 잠금 아래서만 변경)
#[derive(Debug, Default)]
struct StartupGuard {
    /// 제어 메시지 전송 중
    starting: bool,
    /// 전송 중에 들어온 stop 요청
    stop_pending: bool,
}

/// Leap Motion 드라이버
pub struct LeapMotionDriver {
    name: String,
    connection: Arc<dyn Connection>,
    bus: Arc<EventBus>,
    config: DriverConfig,
    state: Arc<watch::Sender<DriverState>>,
    shutdown_tx: watch::Sender<bool>,
    /// 동시 start 호출 직렬화 (제어 메시지 중복 전송 방지)
    start_gate: tokio::sync::Mutex<()>,
    startup: parking_lot::Mutex<StartupGuard>,
    task: parking_lot::Mutex<Option<JoinHandle<()>>>,
    counters: Arc<IngestionCounters>,
}

impl LeapMotionDriver {
    /// 기본 설정으로 드라이버 생성
    ///
    /// `message`, `hand`, `gesture` 토픽을 선언한다.
    pub fn new(name: &str, connection: Arc<dyn Connection>) -> Self {
        Self::with_config(name, connection, DriverConfig::default())
    }

    /// 지정 설정으로 드라이버 생성
    pub fn with_config(name: &str, connection: Arc<dyn Connection>, config: DriverConfig) -> Self {
        let (state_tx, _) = watch::channel(DriverState::Idle);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            name: name.to_string(),
            connection,
            bus: Arc::new(EventBus::new(&Topic::ALL, config.event_capacity)),
            config,
            state: Arc::new(state_tx),
            shutdown_tx,
            start_gate: tokio::sync::Mutex::new(()),
            startup: parking_lot::Mutex::new(StartupGuard::default()),
            task: parking_lot::Mutex::new(None),
            counters: Arc::new(IngestionCounters::default()),
        }
    }

    /// 드라이버 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 장치 연결
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// 현재 상태
    pub fn state(&self) -> DriverState {
        *self.state.borrow()
    }

    /// 상태 변경 수신기
    pub fn watch_state(&self) -> watch::Receiver<DriverState> {
        self.state.subscribe()
    }

    /// 드라이버 시작
    ///
    /// 제어 메시지를 보낸 뒤 수신 루프를 백그라운드 태스크로 띄우고 바로 반환한다.
    /// 이미 실행 중이면 아무 것도 보내지 않고 성공한다.
    /// 전송 중에 stop이 들어왔으면 루프 없이 `Stopped`로 끝나고 `Ok(())`를 반환한다.
    pub async fn start(&self) -> Result<(), DriverError> {
        let _gate = self.start_gate.lock().await;

        {
            let mut startup = self.startup.lock();
            match self.state() {
                DriverState::Running => {
                    debug!("[{}] 이미 실행 중", self.name);
                    return Ok(());
                }
                DriverState::Stopped => return Err(DriverError::Terminated),
                DriverState::Idle => {}
            }
            *startup = StartupGuard {
                starting: true,
                stop_pending: false,
            };
        }

        let control = ControlMessage {
            enable_gestures: self.config.enable_gestures,
        };
        let sent = match decoder::encode_control(&control) {
            Ok(payload) => self.connection.send(&payload).await,
            Err(e) => Err(TransportError::Protocol(e.to_string())),
        };

        // 상태 전이는 stop()과 같은 잠금 아래서
        let stop_pending = {
            let mut startup = self.startup.lock();
            let pending = startup.stop_pending;
            *startup = StartupGuard::default();
            if sent.is_ok() {
                let next = if pending {
                    DriverState::Stopped
                } else {
                    DriverState::Running
                };
                self.state.send_replace(next);
            }
            pending
        };

        if let Err(e) = sent {
            error!("[{}] 제어 메시지 전송 실패: {e}", self.name);
            return Err(DriverError::Startup(e));
        }

        if stop_pending {
            self.shutdown_tx.send_replace(true);
            self.bus.notify(DriverEvent::StateChanged(DriverState::Stopped));
            info!("[{}] 시작 중 중지 요청, 수신 루프 없이 종료", self.name);
            if let Err(e) = self.connection.close().await {
                warn!("[{}] 연결 종료 실패: {e}", self.name);
            }
            return Ok(());
        }

        self.bus.notify(DriverEvent::StateChanged(DriverState::Running));

        let ingestion = IngestionLoop {
            name: self.name.clone(),
            connection: Arc::clone(&self.connection),
            bus: Arc::clone(&self.bus),
            counters: Arc::clone(&self.counters),
            state: Arc::clone(&self.state),
            shutdown: self.shutdown_tx.subscribe(),
        };
        *self.task.lock() = Some(tokio::spawn(ingestion.run()));

        info!(
            "[{}] 드라이버 시작 (gestures={})",
            self.name, self.config.enable_gestures
        );
        Ok(())
    }

    /// 드라이버 중지
    ///
    /// 실패하지 않으며, 실행 중이 아니면 no-op. 진행 중인 수신을 기다리지 않고
    /// 종료 신호만 보낸다. 루프 종료까지 기다리려면 [`Self::halt`].
    /// `start`가 제어 메시지를 보내는 중이면 요청을 보류해 두고 `start`가 처리한다.
    pub fn stop(&self) {
        let stopped = {
            let mut startup = self.startup.lock();
            if startup.starting {
                startup.stop_pending = true;
                debug!("[{}] 시작 중 중지 요청 보류", self.name);
                return;
            }
            self.state.send_if_modified(|state| {
                if *state == DriverState::Running {
                    *state = DriverState::Stopped;
                    true
                } else {
                    false
                }
            })
        };

        if stopped {
            self.shutdown_tx.send_replace(true);
            self.bus.notify(DriverEvent::StateChanged(DriverState::Stopped));
            info!("[{}] 드라이버 중지", self.name);
        } else {
            debug!("[{}] 중지 요청 무시 (상태: {})", self.name, self.state());
        }
    }

    /// 중지 후 수신 루프가 연결을 닫고 끝날 때까지 대기
    pub async fn halt(&self) {
        self.stop();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("[{}] 수신 루프 태스크 비정상 종료: {e}", self.name);
            }
        }
    }

    /// `Stopped` 상태가 될 때까지 대기 (요청 또는 전송 실패)
    pub async fn stopped(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == DriverState::Stopped).await;
    }

    /// 리스너 등록
    pub fn register<F>(&self, topic: Topic, listener: F) -> Result<SubscriptionId, DriverError>
    where
        F: Fn(&BusEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Ok(self.bus.register(topic, listener)?)
    }

    /// 토픽 이름으로 리스너 등록
    pub fn register_named<F>(&self, topic: &str, listener: F) -> Result<SubscriptionId, DriverError>
    where
        F: Fn(&BusEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Ok(self.bus.register_named(topic, listener)?)
    }

    /// 채널 구독 등록 (수신 루프를 막지 않음)
    pub fn register_channel(
        &self,
        topic: Topic,
        capacity: usize,
    ) -> Result<(SubscriptionId, mpsc::Receiver<BusEvent>), DriverError> {
        Ok(self.bus.register_channel(topic, capacity)?)
    }

    /// 구독 해제 (멱등)
    pub fn unregister(&self, id: SubscriptionId) -> bool {
        self.bus.unregister(id)
    }

    /// 드라이버 이벤트(상태 전이, 폐기 프레임, 리스너/전송 실패) 구독
    pub fn subscribe_events(&self) -> broadcast::Receiver<DriverEvent> {
        self.bus.subscribe_notices()
    }

    /// 통계 스냅샷
    pub fn stats(&self) -> DriverStats {
        DriverStats::collect(
            &self.counters,
            self.bus.delivered_count(),
            self.bus.failure_count(),
        )
    }
}

impl Drop for LeapMotionDriver {
    fn drop(&mut self) {
        // 수신 루프가 드라이버보다 오래 살지 않도록
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_app_config() {
        let mut app = AppConfig::default_config();
        app.device.enable_gestures = false;
        app.driver.event_capacity = 8;

        let config = DriverConfig::from(&app);
        assert!(!config.enable_gestures);
        assert_eq!(config.event_capacity, 8);
    }
}
