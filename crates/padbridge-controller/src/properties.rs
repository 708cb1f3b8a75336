//! Application-configurable per-axis properties and their transform.

use padbridge_schemas::error::{Error, Result};
use padbridge_schemas::state::{ANALOG_VALUE_MAX, ANALOG_VALUE_MIN};

/// Smallest allowed deadzone or saturation value.
pub const PROPERTY_MODIFIER_MIN: u32 = 0;

/// Largest allowed deadzone or saturation value, meaning the whole travel.
pub const PROPERTY_MODIFIER_MAX: u32 = 10_000;

/// Per-axis range, deadzone, and saturation configuration.
///
/// The transform contracts the dead region around the axis centre, clips at
/// the saturation point, and maps the result onto the configured output
/// range, independently per side of centre so asymmetric ranges behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisProperties {
    /// Travel fraction (in ten-thousandths) treated as centred.
    pub deadzone: u32,
    /// Travel fraction (in ten-thousandths) treated as full deflection.
    pub saturation: u32,
    /// Lower bound of the reported range.
    pub range_min: i32,
    /// Upper bound of the reported range.
    pub range_max: i32,
    /// Whether the transform applies at all; disabled axes report raw
    /// mapped values.
    pub transform_enabled: bool,
}

impl Default for AxisProperties {
    fn default() -> Self {
        AxisProperties {
            deadzone: PROPERTY_MODIFIER_MIN,
            saturation: PROPERTY_MODIFIER_MAX,
            range_min: ANALOG_VALUE_MIN as i32,
            range_max: ANALOG_VALUE_MAX as i32,
            transform_enabled: true,
        }
    }
}

impl AxisProperties {
    /// Validates and sets the deadzone.
    pub fn set_deadzone(&mut self, deadzone: u32) -> Result<()> {
        if deadzone > PROPERTY_MODIFIER_MAX {
            return Err(Error::invalid_argument("axis deadzone", deadzone.to_string()));
        }
        self.deadzone = deadzone;
        Ok(())
    }

    /// Validates and sets the saturation.
    pub fn set_saturation(&mut self, saturation: u32) -> Result<()> {
        if saturation > PROPERTY_MODIFIER_MAX {
            return Err(Error::invalid_argument(
                "axis saturation",
                saturation.to_string(),
            ));
        }
        self.saturation = saturation;
        Ok(())
    }

    /// Validates and sets the output range.
    pub fn set_range(&mut self, range_min: i32, range_max: i32) -> Result<()> {
        if range_min >= range_max {
            return Err(Error::invalid_argument(
                "axis range",
                format!("[{range_min}, {range_max}]"),
            ));
        }
        self.range_min = range_min;
        self.range_max = range_max;
        Ok(())
    }

    /// Centre of the configured output range.
    pub fn range_center(&self) -> i32 {
        // Biased so the symmetric default range centres on zero.
        ((self.range_min as i64 + self.range_max as i64 + 1) / 2) as i32
    }

    /// Applies deadzone, saturation, and range mapping to a raw mapped axis
    /// value in the analog domain.
    pub fn transform(&self, raw: i32) -> i32 {
        if !self.transform_enabled {
            return raw;
        }

        let raw = raw.clamp(ANALOG_VALUE_MIN as i32, ANALOG_VALUE_MAX as i32);
        let center = self.range_center();
        if raw == 0 {
            return center;
        }

        let positive = raw > 0;
        let extreme = if positive {
            ANALOG_VALUE_MAX as i64
        } else {
            -(ANALOG_VALUE_MIN as i64)
        };
        let fraction = raw.unsigned_abs() as f64 / extreme as f64;

        let deadzone = self.deadzone as f64 / PROPERTY_MODIFIER_MAX as f64;
        let saturation = self.saturation as f64 / PROPERTY_MODIFIER_MAX as f64;
        let deflection = if fraction <= deadzone {
            0.0
        } else if fraction >= saturation {
            1.0
        } else {
            (fraction - deadzone) / (saturation - deadzone)
        };

        let half = if positive {
            (self.range_max as i64 - center as i64) as f64
        } else {
            (center as i64 - self.range_min as i64) as f64
        };
        let offset = (deflection * half).round() as i64;
        let value = if positive {
            center as i64 + offset
        } else {
            center as i64 - offset
        };
        value.clamp(self.range_min as i64, self.range_max as i64) as i32
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_transform_stays_in_configured_range(
            raw in i16::MIN as i32..=i16::MAX as i32,
            deadzone in 0u32..=10_000,
            saturation in 0u32..=10_000,
            min in -100_000i32..=0,
            span in 1i32..=200_000,
        ) {
            let props = AxisProperties {
                deadzone,
                saturation,
                range_min: min,
                range_max: min + span,
                transform_enabled: true,
            };
            let out = props.transform(raw);
            prop_assert!(out >= props.range_min && out <= props.range_max);
        }

        #[test]
        fn prop_transform_is_monotonic_on_positive_side(
            a in 0i32..=i16::MAX as i32,
            b in 0i32..=i16::MAX as i32,
            deadzone in 0u32..=9_000,
        ) {
            let mut props = AxisProperties::default();
            props.set_deadzone(deadzone).expect("valid deadzone");
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(props.transform(low) <= props.transform(high));
        }
    }
}
