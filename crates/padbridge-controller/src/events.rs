//! Bounded, sequence-numbered buffer of virtual state changes.

use std::collections::VecDeque;

use padbridge_schemas::elements::{HatDirection, VirtualAxis, VirtualButton};
use padbridge_schemas::error::{Error, Result};

/// Largest event buffer capacity an application may request.
pub const EVENT_BUFFER_CAPACITY_MAX: usize = 1024;

/// One changed virtual element and its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementChange {
    /// An axis moved.
    Axis {
        /// The axis that moved.
        axis: VirtualAxis,
        /// Its new value, after property transforms.
        value: i32,
    },
    /// A button changed state.
    Button {
        /// The button that changed.
        button: VirtualButton,
        /// Its new pressed state.
        pressed: bool,
    },
    /// A hat direction component changed state.
    Hat {
        /// The component that changed.
        direction: HatDirection,
        /// Its new active state.
        active: bool,
    },
}

/// A recorded state change.
///
/// Sequence numbers increase monotonically from 1 and are never reused, so
/// a consumer observing sequence `n` can rely on `1..=n` having existed,
/// present or dropped to overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangeEvent {
    /// Monotonically increasing sequence number, starting at 1.
    pub sequence: u64,
    /// Milliseconds since the owning controller was created.
    pub timestamp_ms: u64,
    /// What changed.
    pub change: ElementChange,
}

/// Circular buffer of state-change events with a sticky overflow flag.
///
/// Capacity zero disables buffering entirely. On overflow the oldest event
/// is dropped and the overflow flag sticks until events are next popped.
#[derive(Debug, Default)]
pub struct EventBuffer {
    capacity: usize,
    events: VecDeque<StateChangeEvent>,
    next_sequence: u64,
    overflowed: bool,
}

impl EventBuffer {
    /// Disabled buffer; call [`EventBuffer::set_capacity`] to enable.
    pub fn new() -> Self {
        EventBuffer {
            capacity: 0,
            events: VecDeque::new(),
            next_sequence: 1,
            overflowed: false,
        }
    }

    /// Reconfigures the capacity. Zero disables buffering; values beyond
    /// [`EVENT_BUFFER_CAPACITY_MAX`] are refused. Buffered events are
    /// discarded and the overflow flag resets; sequence numbering
    /// continues.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity > EVENT_BUFFER_CAPACITY_MAX {
            return Err(Error::capacity_exceeded(
                "event buffer",
                EVENT_BUFFER_CAPACITY_MAX,
            ));
        }
        self.capacity = capacity;
        self.events.clear();
        self.overflowed = false;
        Ok(())
    }

    /// Configured capacity in events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether buffering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are buffered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether events have been dropped since the last pop.
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Records a change, assigning it the next sequence number. Returns the
    /// recorded event, or `None` when buffering is disabled.
    pub fn push(&mut self, change: ElementChange, timestamp_ms: u64) -> Option<StateChangeEvent> {
        if self.capacity == 0 {
            return None;
        }
        if self.events.len() >= self.capacity {
            self.events.pop_front();
            self.overflowed = true;
        }
        let event = StateChangeEvent {
            sequence: self.next_sequence,
            timestamp_ms,
            change,
        };
        self.next_sequence += 1;
        self.events.push_back(event);
        Some(event)
    }

    /// Removes and returns up to `max` oldest events, clearing the
    /// overflow flag.
    pub fn pop_oldest(&mut self, max: usize) -> Vec<StateChangeEvent> {
        let count = max.min(self.events.len());
        let drained: Vec<StateChangeEvent> = self.events.drain(..count).collect();
        self.overflowed = false;
        drained
    }

    /// Returns up to `max` oldest events without removing them.
    pub fn peek_oldest(&self, max: usize) -> Vec<StateChangeEvent> {
        self.events.iter().take(max).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_change(value: i32) -> ElementChange {
        ElementChange::Axis {
            axis: VirtualAxis::X,
            value,
        }
    }

    #[test]
    fn disabled_buffer_records_nothing() {
        let mut buffer = EventBuffer::new();
        assert!(!buffer.is_enabled());
        assert!(buffer.push(axis_change(1), 0).is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn capacity_limit_is_enforced() {
        let mut buffer = EventBuffer::new();
        assert!(buffer.set_capacity(EVENT_BUFFER_CAPACITY_MAX).is_ok());
        assert!(matches!(
            buffer.set_capacity(EVENT_BUFFER_CAPACITY_MAX + 1),
            Err(Error::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn sequences_are_monotonic_from_one() {
        let mut buffer = EventBuffer::new();
        buffer.set_capacity(8).expect("capacity ok");
        for i in 0..5 {
            let event = buffer.push(axis_change(i), i as u64).expect("recorded");
            assert_eq!(event.sequence, i as u64 + 1);
        }
        let events = buffer.pop_oldest(10);
        assert_eq!(events.len(), 5);
        assert!(events.windows(2).all(|w| w[1].sequence == w[0].sequence + 1));
    }

    #[test]
    fn overflow_drops_oldest_and_sticks() {
        let mut buffer = EventBuffer::new();
        buffer.set_capacity(2).expect("capacity ok");
        buffer.push(axis_change(1), 0);
        buffer.push(axis_change(2), 0);
        assert!(!buffer.has_overflowed());
        buffer.push(axis_change(3), 0);
        assert!(buffer.has_overflowed());

        // The oldest event is gone; sequence numbering shows the gap.
        let peeked = buffer.peek_oldest(10);
        assert_eq!(peeked.len(), 2);
        assert_eq!(peeked[0].sequence, 2);
        // Peeking does not clear the sticky flag.
        assert!(buffer.has_overflowed());

        // Popping does.
        let popped = buffer.pop_oldest(1);
        assert_eq!(popped[0].sequence, 2);
        assert!(!buffer.has_overflowed());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn sequence_numbering_survives_reconfiguration() {
        let mut buffer = EventBuffer::new();
        buffer.set_capacity(4).expect("capacity ok");
        buffer.push(axis_change(1), 0);
        buffer.push(axis_change(2), 0);
        buffer.set_capacity(8).expect("capacity ok");
        assert!(buffer.is_empty());
        let event = buffer.push(axis_change(3), 0).expect("recorded");
        assert_eq!(event.sequence, 3);
    }

    #[test]
    fn pop_respects_max() {
        let mut buffer = EventBuffer::new();
        buffer.set_capacity(8).expect("capacity ok");
        for i in 0..6 {
            buffer.push(axis_change(i), 0);
        }
        assert_eq!(buffer.pop_oldest(2).len(), 2);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.peek_oldest(100).len(), 4);
    }
}
