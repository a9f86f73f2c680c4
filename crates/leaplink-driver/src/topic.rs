//! 이벤트 토픽과 버스 이벤트.

use leaplink_core::error::UnknownTopicError;
use leaplink_core::models::{Frame, Gesture, Hand};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 드라이버가 발행하는 이벤트 카테고리 (닫힌 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    /// 디코딩된 프레임 전체
    Message,
    /// 프레임 안의 손 하나
    Hand,
    /// 프레임 안의 제스처 하나
    Gesture,
}

impl Topic {
    /// 전체 토픽 (발행 순서)
    pub const ALL: [Topic; 3] = [Topic::Message, Topic::Hand, Topic::Gesture];

    /// 토픽 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Message => "message",
            Topic::Hand => "hand",
            Topic::Gesture => "gesture",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = UnknownTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Topic::Message),
            "hand" => Ok(Topic::Hand),
            "gesture" => Ok(Topic::Gesture),
            other => Err(UnknownTopicError {
                topic: other.to_string(),
            }),
        }
    }
}

/// 버스로 전달되는 이벤트.
///
/// 프레임은 `Arc`로 공유되어 구독자가 수정할 수 없고,
/// 손/제스처는 이벤트마다 별도 값으로 전달된다.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    Message(Arc<Frame>),
    Hand(Hand),
    Gesture(Gesture),
}

impl BusEvent {
    /// 이벤트가 속한 토픽
    pub fn topic(&self) -> Topic {
        match self {
            BusEvent::Message(_) => Topic::Message,
            BusEvent::Hand(_) => Topic::Hand,
            BusEvent::Gesture(_) => Topic::Gesture,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            BusEvent::Message(frame) => Some(&**frame),
            _ => None,
        }
    }

    pub fn as_hand(&self) -> Option<&Hand> {
        match self {
            BusEvent::Hand(hand) => Some(hand),
            _ => None,
        }
    }

    pub fn as_gesture(&self) -> Option<&Gesture> {
        match self {
            BusEvent::Gesture(gesture) => Some(gesture),
            _ => None,
        }
    }
}
