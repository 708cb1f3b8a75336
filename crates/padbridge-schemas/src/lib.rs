//! Shared domain types for the padbridge virtual controller stack.
//!
//! This crate defines the vocabulary every other padbridge crate speaks:
//!
//! - [`elements`]: the fixed physical element space of a modern gamepad and
//!   the virtual element space of a legacy joystick device
//! - [`state`]: physical snapshots as read from a gamepad driver and the
//!   virtual controller state produced by a mapper layout
//! - [`capabilities`]: the derived description of what a mapper layout
//!   exposes to applications
//! - [`forces`]: the shared value domain of the force-feedback pipeline
//! - [`error`]: the unified error type returned by every fallible core
//!   operation
//!
//! Types here are plain values: no locks, no interior mutability, no
//! platform dependencies.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod capabilities;
pub mod elements;
pub mod error;
pub mod forces;
pub mod prelude;
pub mod state;

pub use capabilities::{AxisCapability, Capabilities};
pub use elements::{HatDirection, PhysicalElement, VirtualAxis, VirtualButton, VirtualElement};
pub use error::{Error, Result};
pub use forces::{ActuatorComponents, EffectTimeMs, EffectValue, OrderedMagnitudeComponents};
pub use state::{ButtonSet, GamepadSnapshot, HatState, PhysicalState, VirtualState};
