//! Force feedback effects and in-process device emulation.
//!
//! [`Effect`] values are parameterised, time-addressable force functions:
//! constant, ramp, the periodic family, and application-sampled custom
//! forces, each shaped by an optional envelope and distributed over its
//! declared axes by a [`DirectionVector`]. The [`ForceFeedbackDevice`]
//! emulates the buffer of a physical controller: it schedules playback with
//! independent per-effect clocks, iterates effects, and composes the
//! playing set into one per-axis magnitude vector per sample, which the
//! mapping layer then projects onto physical actuators.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod constants;
pub mod device;
pub mod direction;
pub mod effect;
pub mod envelope;

pub use device::ForceFeedbackDevice;
pub use direction::{CoordinateSystem, DirectionVector};
pub use effect::{CustomForceParams, Effect, EffectId, EffectKind, PeriodicParams, Waveform};
pub use envelope::Envelope;
