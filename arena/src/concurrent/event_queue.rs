// arena/src/concurrent/event_queue.rs
use crate::core::types::{AgentId, TargetRef, Vec2};
use crossbeam_queue::SegQueue;
use serde::Serialize;
use std::sync::Arc;

/// Presentation-side events. The core never renders or plays audio; it only reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ArenaEvent {
    ShotFired { shooter: AgentId, target: TargetRef, from: Vec2, hit: bool },
    Hit { target: TargetRef, damage: f32, remaining_health: f32 },
    Death { victim: TargetRef, killer: Option<TargetRef>, position: Vec2 },
    Respawned { who: TargetRef, position: Vec2 },
    DarkMode { enabled: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPriority {
    High,
    Normal,
    Low,
}

impl ArenaEvent {
    pub fn priority(&self) -> EventPriority {
        match self {
            ArenaEvent::Death { .. } | ArenaEvent::DarkMode { .. } => EventPriority::High,
            ArenaEvent::Hit { .. } | ArenaEvent::Respawned { .. } => EventPriority::Normal,
            ArenaEvent::ShotFired { .. } => EventPriority::Low,
        }
    }
}

/// Receiver for effect triggers (muzzle flash, hit markers, death sounds).
pub trait EffectsSink {
    fn emit(&mut self, event: ArenaEvent);
}

/// Lock-free queue with three priority lanes; pops drain high before normal before low.
#[derive(Clone)]
pub struct PriorityEventQueue {
    high_priority: Arc<SegQueue<ArenaEvent>>,
    normal_priority: Arc<SegQueue<ArenaEvent>>,
    low_priority: Arc<SegQueue<ArenaEvent>>,
}

impl PriorityEventQueue {
    pub fn new() -> Self {
        PriorityEventQueue {
            high_priority: Arc::new(SegQueue::new()),
            normal_priority: Arc::new(SegQueue::new()),
            low_priority: Arc::new(SegQueue::new()),
        }
    }

    pub fn push(&self, event: ArenaEvent) {
        match event.priority() {
            EventPriority::High => self.high_priority.push(event),
            EventPriority::Normal => self.normal_priority.push(event),
            EventPriority::Low => self.low_priority.push(event),
        }
    }

    pub fn pop(&self) -> Option<ArenaEvent> {
        self.high_priority
            .pop()
            .or_else(|| self.normal_priority.pop())
            .or_else(|| self.low_priority.pop())
    }

    pub fn pop_batch(&self, max_count: usize) -> Vec<ArenaEvent> {
        let mut batch = Vec::with_capacity(max_count.min(self.len()));
        while batch.len() < max_count {
            match self.pop() {
                Some(event) => batch.push(event),
                None => break,
            }
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.high_priority.is_empty() && self.normal_priority.is_empty() && self.low_priority.is_empty()
    }

    pub fn len(&self) -> usize {
        self.high_priority.len() + self.normal_priority.len() + self.low_priority.len()
    }
}

impl Default for PriorityEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectsSink for PriorityEventQueue {
    fn emit(&mut self, event: ArenaEvent) {
        self.push(event);
    }
}

impl EffectsSink for Vec<ArenaEvent> {
    fn emit(&mut self, event: ArenaEvent) {
        self.push(event);
    }
}
