//! 토픽 기반 이벤트 버스.
//!
//! 생성 시 선언한 토픽 집합에 대해서만 구독을 받는다.
//! 리스너는 `publish`를 호출한 태스크에서 동기로 실행되며,
//! 에러를 반환하거나 panic한 리스너는 해당 리스너만 격리되어 진단 이벤트로 보고된다.
//!
//! 구독 목록은 발행 시점의 스냅샷으로 순회하므로, 발행 도중의 등록/해제가
//! 목록을 깨뜨리거나 교착을 만들지 않는다. 해제된 구독은 `active` 플래그로
//! 호출 직전에 걸러진다.

use leaplink_core::error::{ListenerError, UnknownTopicError};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::events::DriverEvent;
use crate::topic::{BusEvent, Topic};

/// 구독 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

type ListenerFn = dyn Fn(&BusEvent) -> Result<(), ListenerError> + Send + Sync;

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    active: AtomicBool,
    listener: Box<ListenerFn>,
}

/// 토픽 이벤트 버스
pub struct EventBus {
    topics: HashSet<Topic>,
    listeners: RwLock<HashMap<Topic, Vec<Arc<Subscription>>>>,
    next_id: AtomicU64,
    notices: broadcast::Sender<DriverEvent>,
    delivered: AtomicU64,
    failures: AtomicU64,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    ///
    /// `topics`에 없는 토픽은 구독할 수 없다. `notice_capacity`는
    /// 진단 이벤트 브로드캐스트 버퍼 크기.
    pub fn new(topics: &[Topic], notice_capacity: usize) -> Self {
        let (notices, _) = broadcast::channel(notice_capacity.max(1));
        Self {
            topics: topics.iter().copied().collect(),
            listeners: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            notices,
            delivered: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// 선언된 토픽인지
    pub fn accepts(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// 리스너 등록
    pub fn register<F>(&self, topic: Topic, listener: F) -> Result<SubscriptionId, UnknownTopicError>
    where
        F: Fn(&BusEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        if !self.accepts(topic) {
            return Err(UnknownTopicError {
                topic: topic.to_string(),
            });
        }

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscription = Arc::new(Subscription {
            id,
            topic,
            active: AtomicBool::new(true),
            listener: Box::new(listener),
        });
        self.listeners
            .write()
            .entry(topic)
            .or_default()
            .push(subscription);

        debug!("구독 등록: {id} ({topic})");
        Ok(id)
    }

    /// 토픽 이름으로 리스너 등록
    pub fn register_named<F>(&self, topic: &str, listener: F) -> Result<SubscriptionId, UnknownTopicError>
    where
        F: Fn(&BusEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let topic: Topic = topic.parse()?;
        self.register(topic, listener)
    }

    /// 채널 구독 등록
    ///
    /// 이벤트를 크기 `capacity`의 채널로 전달한다. 전달은 `try_send`라서
    /// 발행 태스크를 막지 않으며, 채널이 가득 차면 해당 이벤트는 이 구독자에게만
    /// 유실된다 ([`ListenerError::Lagged`]). 수신 측을 drop하면 구독이 자동 해제된다.
    pub fn register_channel(
        &self,
        topic: Topic,
        capacity: usize,
    ) -> Result<(SubscriptionId, mpsc::Receiver<BusEvent>), UnknownTopicError> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let id = self.register(topic, move |event| {
            tx.try_send(event.clone()).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => ListenerError::Lagged,
                mpsc::error::TrySendError::Closed(_) => ListenerError::Disconnected,
            })
        })?;
        Ok((id, rx))
    }

    /// 구독 해제. 이미 해제된 구독이면 `false` (에러 아님).
    pub fn unregister(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        for subscriptions in listeners.values_mut() {
            if let Some(pos) = subscriptions.iter().position(|s| s.id == id) {
                let removed = subscriptions.remove(pos);
                removed.active.store(false, Ordering::Release);
                debug!("구독 해제: {id} ({})", removed.topic);
                return true;
            }
        }
        false
    }

    /// 토픽의 현재 구독자 수
    pub fn listener_count(&self, topic: Topic) -> usize {
        self.listeners.read().get(&topic).map_or(0, Vec::len)
    }

    /// 진단 이벤트 구독
    pub fn subscribe_notices(&self) -> broadcast::Receiver<DriverEvent> {
        self.notices.subscribe()
    }

    /// 성공한 리스너 호출 누계
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// 실패한 리스너 호출 누계
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// 진단 이벤트 발송 (수신자가 없으면 버림)
    pub(crate) fn notify(&self, event: DriverEvent) {
        let _ = self.notices.send(event);
    }

    /// 이벤트 발행
    ///
    /// 발행 시점에 등록된 리스너 전원에게 전달하고, 성공한 전달 수를 반환한다.
    /// 리스너 실패는 호출자에게 전파되지 않는다.
    pub(crate) fn publish(&self, event: &BusEvent) -> usize {
        let topic = event.topic();
        let snapshot: Vec<Arc<Subscription>> = match self.listeners.read().get(&topic) {
            Some(subscriptions) => subscriptions.clone(),
            None => return 0,
        };

        let mut delivered = 0;
        for subscription in snapshot {
            if !subscription.active.load(Ordering::Acquire) {
                continue;
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| (subscription.listener)(event)));
            match result {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(error)) => self.report_failure(&subscription, error),
                Err(payload) => {
                    self.report_failure(&subscription, ListenerError::Panicked(panic_message(&*payload)))
                }
            }
        }

        self.delivered.fetch_add(delivered as u64, Ordering::Relaxed);
        delivered
    }

    fn report_failure(&self, subscription: &Subscription, error: ListenerError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        warn!(
            "리스너 실패: {} ({}): {error}",
            subscription.id, subscription.topic
        );

        if error == ListenerError::Disconnected {
            self.unregister(subscription.id);
        }

        self.notify(DriverEvent::ListenerFailed {
            topic: subscription.topic,
            subscription: subscription.id,
            error,
        });
    }
}

/// panic payload에서 메시지 추출
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "알 수 없는 panic".to_string()
    }
}
