//! Stateful virtual controller facade.
//!
//! Sits between the mapping engine and the legacy device surface: caches
//! the last mapped state, applies application-configured per-axis
//! properties, buffers state-change events in a bounded ring, and gates
//! force feedback behind exclusive registration on the underlying device.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod controller;
pub mod events;
pub mod properties;

pub use controller::{StateChangeListener, VirtualController};
pub use events::{ElementChange, EventBuffer, StateChangeEvent, EVENT_BUFFER_CAPACITY_MAX};
pub use properties::{AxisProperties, PROPERTY_MODIFIER_MAX, PROPERTY_MODIFIER_MIN};
