//! Convenient re-exports of the most commonly used schema types.

pub use crate::capabilities::{AxisCapability, Capabilities};
pub use crate::elements::{
    HatDirection, PhysicalElement, VirtualAxis, VirtualButton, VirtualElement,
};
pub use crate::error::{Error, Result};
pub use crate::forces::{
    ActuatorComponents, EffectTimeMs, EffectValue, OrderedMagnitudeComponents,
    PhysicalActuatorValue, EFFECT_MAGNITUDE_MAX, EFFECT_MAGNITUDE_MIN, EFFECT_MAGNITUDE_ZERO,
    EFFECT_MODIFIER_MAX, EFFECT_MODIFIER_MIN, ZERO_MAGNITUDE_COMPONENTS,
};
pub use crate::state::{
    ButtonSet, GamepadSnapshot, HatState, PhysicalState, VirtualState, ANALOG_VALUE_MAX,
    ANALOG_VALUE_MIN, ANALOG_VALUE_NEUTRAL, TRIGGER_VALUE_MAX, TRIGGER_VALUE_MID,
    TRIGGER_VALUE_MIN,
};
