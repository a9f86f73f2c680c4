//! 바이너리용 구독자: 손/제스처 로그, 드라이버 진단 로그, 프레임 출력.

use leaplink_core::error::DriverError;
use leaplink_core::models::{Gesture, Hand};
use leaplink_driver::{BusEvent, DriverEvent, LeapMotionDriver, SubscriptionId, Topic};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 손 한 줄 요약
pub fn describe_hand(hand: &Hand) -> String {
    format!(
        "hand#{} {:?} palm=({:.1}, {:.1}, {:.1}) grab={:.2} pinch={:.2}",
        hand.id,
        hand.hand_type,
        hand.x(),
        hand.y(),
        hand.z(),
        hand.grab_strength,
        hand.pinch_strength
    )
}

/// 제스처 한 줄 요약
pub fn describe_gesture(gesture: &Gesture) -> String {
    format!(
        "gesture#{} {:?}/{:?} hands={:?} duration={}us",
        gesture.id, gesture.kind, gesture.state, gesture.hand_ids, gesture.duration
    )
}

/// 손/제스처 토픽에 로그 리스너 등록
pub fn attach_logging(driver: &LeapMotionDriver) -> Result<Vec<SubscriptionId>, DriverError> {
    let hand = driver.register(Topic::Hand, |event| {
        if let Some(hand) = event.as_hand() {
            debug!("{}", describe_hand(hand));
        }
        Ok(())
    })?;

    let gesture = driver.register(Topic::Gesture, |event| {
        if let Some(gesture) = event.as_gesture() {
            info!("{}", describe_gesture(gesture));
        }
        Ok(())
    })?;

    Ok(vec![hand, gesture])
}

/// 드라이버 진단 이벤트 로거
pub fn spawn_diagnostics(mut events: broadcast::Receiver<DriverEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(DriverEvent::StateChanged(state)) => info!("드라이버 상태: {state}"),
                Ok(DriverEvent::FrameDropped {
                    reason,
                    payload_len,
                }) => {
                    debug!("프레임 폐기 ({payload_len} bytes): {reason}");
                }
                Ok(DriverEvent::ListenerFailed {
                    topic,
                    subscription,
                    error,
                }) => {
                    debug!("리스너 실패 {subscription} ({topic}): {error}");
                }
                Ok(DriverEvent::TransportFailed(e)) => error!("장치 연결 끊김: {e}"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("진단 이벤트 {n}건 유실");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// 프레임을 JSON 한 줄씩 표준 출력으로 내보내는 태스크
pub fn spawn_frame_printer(mut frames: mpsc::Receiver<BusEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = frames.recv().await {
            let Some(frame) = event.as_frame() else {
                continue;
            };
            match serde_json::to_string(frame) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("프레임 직렬화 실패: {e}"),
            }
        }
    })
}
