//! Effect direction vectors.
//!
//! A direction vector distributes an effect's scalar magnitude over the
//! effect's declared axes. Components are stored normalized, so the
//! distribution preserves the overall Euclidean magnitude.

use serde::{Deserialize, Serialize};

use padbridge_schemas::error::{Error, Result};
use padbridge_schemas::forces::EffectValue;

use crate::constants::{EFFECT_ANGLE_MAX, EFFECT_ANGLE_MIN, EFFECT_AXES_MAX, EFFECT_AXES_MIN};

/// Coordinate system a direction was originally expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// One component per declared axis.
    Cartesian,
    /// A single angle over exactly two axes.
    Polar,
}

/// Normalized direction over an effect's declared axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionVector {
    system: CoordinateSystem,
    unit: Vec<EffectValue>,
}

impl DirectionVector {
    /// Direction from cartesian components, one per declared axis.
    ///
    /// Requires 1 to 4 finite components, not all zero.
    pub fn cartesian(components: &[EffectValue]) -> Result<Self> {
        if components.len() < EFFECT_AXES_MIN || components.len() > EFFECT_AXES_MAX {
            return Err(Error::invalid_argument(
                "direction components",
                format!("expected 1..=4 components, got {}", components.len()),
            ));
        }
        if components.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid_argument(
                "direction components",
                "components must be finite",
            ));
        }
        let norm = components
            .iter()
            .map(|c| c * c)
            .sum::<EffectValue>()
            .sqrt();
        if norm == 0.0 {
            return Err(Error::invalid_argument(
                "direction components",
                "at least one component must be nonzero",
            ));
        }
        Ok(DirectionVector {
            system: CoordinateSystem::Cartesian,
            unit: components.iter().map(|c| c / norm).collect(),
        })
    }

    /// Direction from a polar angle in hundredths of degrees, over exactly
    /// two axes. Zero points along the negative second axis.
    pub fn polar(angle_hundredths: EffectValue) -> Result<Self> {
        if !(EFFECT_ANGLE_MIN..=EFFECT_ANGLE_MAX).contains(&angle_hundredths) {
            return Err(Error::invalid_argument(
                "polar angle",
                format!("{angle_hundredths} outside 0..=35999"),
            ));
        }
        let radians = (angle_hundredths / 100.0).to_radians();
        Ok(DirectionVector {
            system: CoordinateSystem::Polar,
            unit: vec![radians.sin(), -radians.cos()],
        })
    }

    /// Coordinate system this direction was expressed in.
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// Number of components, equal to the number of declared axes.
    pub fn component_count(&self) -> usize {
        self.unit.len()
    }

    /// Normalized components, one per declared axis.
    pub fn unit_components(&self) -> &[EffectValue] {
        &self.unit
    }
}
