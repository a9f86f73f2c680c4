//! 수신 루프 통계.

use std::sync::atomic::{AtomicU64, Ordering};

/// 수신 루프 카운터 (lock-free)
#[derive(Debug, Default)]
pub(crate) struct IngestionCounters {
    pub(crate) frames_received: AtomicU64,
    pub(crate) frames_decoded: AtomicU64,
    pub(crate) frames_dropped: AtomicU64,
    pub(crate) events_published: AtomicU64,
}

impl IngestionCounters {
    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

/// 드라이버 통계 스냅샷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// 수신한 페이로드 수
    pub frames_received: u64,
    /// 디코딩에 성공한 프레임 수
    pub frames_decoded: u64,
    /// 디코딩 실패로 폐기한 프레임 수
    pub frames_dropped: u64,
    /// 발행한 이벤트 수 (message + hand + gesture)
    pub events_published: u64,
    /// 성공한 리스너 호출 수
    pub listener_deliveries: u64,
    /// 실패한 리스너 호출 수
    pub listener_failures: u64,
}

impl DriverStats {
    pub(crate) fn collect(counters: &IngestionCounters, deliveries: u64, failures: u64) -> Self {
        Self {
            frames_received: counters.frames_received.load(Ordering::Relaxed),
            frames_decoded: counters.frames_decoded.load(Ordering::Relaxed),
            frames_dropped: counters.frames_dropped.load(Ordering::Relaxed),
            events_published: counters.events_published.load(Ordering::Relaxed),
            listener_deliveries: deliveries,
            listener_failures: failures,
        }
    }
}
