//! Value domain shared by the force-feedback pipeline.
//!
//! Effects compute in a signed magnitude domain bounded by
//! [`EFFECT_MAGNITUDE_MAX`]; the mapper layer projects the per-axis
//! magnitude vector onto physical actuators, whose power values are
//! unsigned 16-bit.

use serde::{Deserialize, Serialize};

use crate::elements::VirtualAxis;

/// Scalar type for effect-related computation.
pub type EffectValue = f32;

/// Milliseconds, as tracked by force-feedback clocks.
pub type EffectTimeMs = u32;

/// Power value deliverable to one physical actuator.
pub type PhysicalActuatorValue = u16;

/// Maximum effect output magnitude: full strength, positive direction.
pub const EFFECT_MAGNITUDE_MAX: EffectValue = 10000.0;

/// Minimum effect output magnitude: full strength, negative direction.
pub const EFFECT_MAGNITUDE_MIN: EffectValue = -10000.0;

/// Output magnitude meaning no force at all.
pub const EFFECT_MAGNITUDE_ZERO: EffectValue = 0.0;

/// Minimum value for an effect modifier (gain, envelope level).
pub const EFFECT_MODIFIER_MIN: EffectValue = 0.0;

/// Maximum value for an effect modifier (gain, envelope level).
pub const EFFECT_MODIFIER_MAX: EffectValue = 10000.0;

/// Force magnitude broken into per-axis components, one slot per virtual
/// axis in [`VirtualAxis`] index order. Slots for axes an effect does not
/// declare stay zero, so vectors from unrelated effects sum element-wise.
pub type OrderedMagnitudeComponents = [EffectValue; VirtualAxis::COUNT];

/// An all-zero magnitude component vector.
pub const ZERO_MAGNITUDE_COMPONENTS: OrderedMagnitudeComponents = [0.0; VirtualAxis::COUNT];

/// Force vector expressed per physical actuator, ready for a driver to
/// transmit to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorComponents {
    /// Left motor (low-frequency rumble).
    pub left_motor: PhysicalActuatorValue,
    /// Right motor (high-frequency rumble).
    pub right_motor: PhysicalActuatorValue,
    /// Impulse actuator embedded in the left trigger.
    pub left_impulse_trigger: PhysicalActuatorValue,
    /// Impulse actuator embedded in the right trigger.
    pub right_impulse_trigger: PhysicalActuatorValue,
}

impl ActuatorComponents {
    /// Whether every actuator is idle.
    pub const fn is_zero(&self) -> bool {
        self.left_motor == 0
            && self.right_motor == 0
            && self.left_impulse_trigger == 0
            && self.right_impulse_trigger == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_components_are_zero() {
        assert!(ActuatorComponents::default().is_zero());
        assert!(!ActuatorComponents {
            right_motor: 1,
            ..Default::default()
        }
        .is_zero());
    }

    #[test]
    fn magnitude_vector_covers_every_axis() {
        assert_eq!(ZERO_MAGNITUDE_COMPONENTS.len(), VirtualAxis::COUNT);
    }
}
