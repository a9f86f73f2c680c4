//! 프레임 수신 루프.
//!
//! 장치 페이로드 수신 → 디코딩 → 팬아웃(message, hand…, gesture…)을 반복한다.
//! 디코딩 실패는 해당 프레임만 폐기하고 계속하며, 수신 실패는 루프를 끝낸다.
//! 연결 종료(`close`)는 루프가 빠져나갈 때 이 태스크에서 한 번만 수행한다.

use leaplink_core::decoder;
use leaplink_core::error::TransportError;
use leaplink_core::models::Frame;
use leaplink_core::ports::connection::Connection;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::event_bus::EventBus;
use crate::events::{DriverEvent, DriverState};
use crate::stats::IngestionCounters;
use crate::topic::BusEvent;

/// 디코딩 실패 로그에 남길 페이로드 미리보기 길이
const PREVIEW_CHARS: usize = 64;

/// 드라이버 인스턴스당 하나의 수신 루프
pub(crate) struct IngestionLoop {
    pub(crate) name: String,
    pub(crate) connection: Arc<dyn Connection>,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) counters: Arc<IngestionCounters>,
    pub(crate) state: Arc<watch::Sender<DriverState>>,
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl IngestionLoop {
    /// 종료 신호나 수신 실패까지 실행
    pub(crate) async fn run(mut self) {
        info!("[{}] 수신 루프 시작", self.name);

        loop {
            let stop_requested = *self.shutdown.borrow();
            if stop_requested {
                break;
            }

            let received = tokio::select! {
                biased;
                // 값 변경 또는 송신 측 drop 모두 종료 신호
                _ = self.shutdown.changed() => break,
                received = self.connection.receive() => received,
            };

            match received {
                Ok(payload) => self.handle_payload(&payload),
                Err(e) => {
                    self.fail(e);
                    break;
                }
            }
        }

        if let Err(e) = self.connection.close().await {
            warn!("[{}] 연결 종료 실패: {e}", self.name);
        }
        info!("[{}] 수신 루프 종료", self.name);
    }

    /// 페이로드 하나 처리
    pub(crate) fn handle_payload(&self, payload: &[u8]) {
        IngestionCounters::bump(&self.counters.frames_received, 1);

        match decoder::decode(payload) {
            Ok(frame) => {
                IngestionCounters::bump(&self.counters.frames_decoded, 1);
                debug!(
                    "[{}] 프레임 {}: hands={}, gestures={}",
                    self.name,
                    frame.id,
                    frame.hands.len(),
                    frame.gestures.len()
                );
                let published = fan_out(&self.bus, frame);
                IngestionCounters::bump(&self.counters.events_published, published as u64);
            }
            Err(e) => {
                IngestionCounters::bump(&self.counters.frames_dropped, 1);
                warn!(
                    "[{}] 프레임 폐기: {e} (payload: {:?})",
                    self.name,
                    e.payload_preview(PREVIEW_CHARS)
                );
                self.bus.notify(DriverEvent::FrameDropped {
                    reason: e.source.to_string(),
                    payload_len: e.payload.len(),
                });
            }
        }
    }

    /// 수신 실패 처리: Running → Stopped
    fn fail(&self, error: TransportError) {
        let transitioned = self.state.send_if_modified(|state| {
            if *state == DriverState::Running {
                *state = DriverState::Stopped;
                true
            } else {
                false
            }
        });

        if transitioned {
            error!("[{}] 장치 수신 실패, 드라이버 중지: {error}", self.name);
            self.bus.notify(DriverEvent::TransportFailed(error));
            self.bus.notify(DriverEvent::StateChanged(DriverState::Stopped));
        } else {
            debug!("[{}] 종료 중 수신 에러 무시: {error}", self.name);
        }
    }
}

/// 프레임 하나를 발행하고 발행한 이벤트 수를 반환.
///
/// `message`가 먼저, 이어서 손과 제스처를 프레임 안의 순서대로 발행한다.
pub(crate) fn fan_out(bus: &EventBus, frame: Frame) -> usize {
    let frame = Arc::new(frame);
    bus.publish(&BusEvent::Message(Arc::clone(&frame)));

    for hand in &frame.hands {
        bus.publish(&BusEvent::Hand(hand.clone()));
    }
    for gesture in &frame.gestures {
        bus.publish(&BusEvent::Gesture(gesture.clone()));
    }

    1 + frame.hands.len() + frame.gestures.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::Topic;
    use leaplink_core::models::{Gesture, Hand};
    use parking_lot::Mutex;

    fn recording_bus() -> (EventBus, Arc<Mutex<Vec<BusEvent>>>) {
        let bus = EventBus::new(&Topic::ALL, 16);
        let seen = Arc::new(Mutex::new(Vec::new()));
        for topic in Topic::ALL {
            let sink = seen.clone();
            bus.register(topic, move |event| {
                sink.lock().push(event.clone());
                Ok(())
            })
            .unwrap();
        }
        (bus, seen)
    }

    #[test]
    fn message_precedes_entities_in_source_order() {
        let (bus, seen) = recording_bus();
        let frame = Frame {
            id: 5,
            hands: vec![
                Hand {
                    id: 1,
                    ..Default::default()
                },
                Hand {
                    id: 2,
                    ..Default::default()
                },
            ],
            gestures: vec![Gesture {
                id: 9,
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(fan_out(&bus, frame.clone()), 4);

        let seen = seen.lock();
        let topics: Vec<Topic> = seen.iter().map(BusEvent::topic).collect();
        assert_eq!(
            topics,
            vec![Topic::Message, Topic::Hand, Topic::Hand, Topic::Gesture]
        );
        assert_eq!(seen[0].as_frame(), Some(&frame));
        assert_eq!(seen[1].as_hand().map(|h| h.id), Some(1));
        assert_eq!(seen[2].as_hand().map(|h| h.id), Some(2));
        assert_eq!(seen[3].as_gesture().map(|g| g.id), Some(9));
    }

    #[test]
    fn empty_frame_publishes_only_message() {
        let (bus, seen) = recording_bus();
        assert_eq!(fan_out(&bus, Frame::default()), 1);
        assert_eq!(seen.lock().len(), 1);
    }
}
