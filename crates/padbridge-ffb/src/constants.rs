//! Force feedback constants.

use padbridge_schemas::forces::{EffectTimeMs, EffectValue};

pub use padbridge_schemas::forces::{
    EFFECT_MAGNITUDE_MAX, EFFECT_MAGNITUDE_MIN, EFFECT_MAGNITUDE_ZERO, EFFECT_MODIFIER_MAX,
    EFFECT_MODIFIER_MIN,
};

/// Maximum number of effects a device buffer holds, playing or not.
pub const EFFECT_MAX_COUNT: usize = 256;

/// Minimum number of axes an effect must declare.
pub const EFFECT_AXES_MIN: usize = 1;

/// Maximum number of axes an effect may declare.
pub const EFFECT_AXES_MAX: usize = 4;

/// Minimum polar angle, in hundredths of degrees.
pub const EFFECT_ANGLE_MIN: EffectValue = 0.0;

/// Maximum polar angle, in hundredths of degrees (359.99 degrees).
pub const EFFECT_ANGLE_MAX: EffectValue = 35999.0;

/// Default interval between force feedback samples sent to the driver.
pub const DEFAULT_SAMPLE_PERIOD_MS: EffectTimeMs = 10;
