//! Declarative physical-to-virtual controller mapping.
//!
//! A [`MapperLayout`] binds each physical gamepad element to an optional
//! [`ElementMapper`] describing how that element's readings contribute to a
//! virtual legacy joystick: axes sum and saturate, buttons and hat
//! components OR together. The layout also carries the actuator map used to
//! project virtual force-feedback vectors back onto physical rumble motors.
//!
//! Layouts are immutable; new ones are assembled at runtime through the
//! [`MapperBuilder`] from blueprints that may reference other layouts as
//! templates. Every finished layout lives in an explicit [`MapperRegistry`]
//! owned by the embedding application.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod builder;
pub mod definitions;
pub mod element;
pub mod layout;

pub use builder::{MapperBuilder, MapperRegistry};
pub use element::{AxisDirection, ElementMapper, StateAccumulator};
pub use layout::{Actuator, ActuatorMap, ElementMap, MapperLayout};
