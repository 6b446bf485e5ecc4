// ==========================================
// 记录型事件发布者 - 用于验证事件发布
// ==========================================

#![allow(dead_code)]

use lot_allocator::engine::{AllocationEvent, AllocationEventPublisher, AllocationEventType};
use std::error::Error;
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<AllocationEvent>>,
}

impl RecordingPublisher {
    pub fn event_types(&self) -> Vec<AllocationEventType> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect()
    }

    pub fn events(&self) -> Vec<AllocationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AllocationEventPublisher for RecordingPublisher {
    fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
