//! Derived capabilities of a mapper layout.

use serde::{Deserialize, Serialize};

use crate::elements::VirtualAxis;

/// Presence and force-feedback support of one virtual axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCapability {
    /// The axis being described.
    pub axis: VirtualAxis,
    /// Whether a physical actuator projects force feedback onto this axis.
    pub supports_force_feedback: bool,
}

/// What a mapper layout exposes to applications, derived entirely from the
/// layout's element mappers and actuator map.
///
/// Capabilities act as metadata: they drive enumeration and data-format
/// decisions in the legacy surface but never affect state mapping itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Present axes in [`VirtualAxis`] order.
    pub axes: Vec<AxisCapability>,
    /// Number of buttons, one greater than the highest referenced index.
    pub num_buttons: u16,
    /// Whether any element mapper targets a hat component.
    pub has_pov: bool,
}

impl Capabilities {
    /// Number of present axes.
    #[inline]
    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    /// Whether the given axis is present.
    pub fn has_axis(&self, axis: VirtualAxis) -> bool {
        self.axes.iter().any(|cap| cap.axis == axis)
    }

    /// Capability entry for the given axis, if present.
    pub fn axis_capability(&self, axis: VirtualAxis) -> Option<AxisCapability> {
        self.axes.iter().copied().find(|cap| cap.axis == axis)
    }

    /// Whether any present axis supports force feedback.
    pub fn supports_force_feedback(&self) -> bool {
        self.axes.iter().any(|cap| cap.supports_force_feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Capabilities {
        Capabilities {
            axes: vec![
                AxisCapability {
                    axis: VirtualAxis::X,
                    supports_force_feedback: true,
                },
                AxisCapability {
                    axis: VirtualAxis::RotZ,
                    supports_force_feedback: false,
                },
            ],
            num_buttons: 12,
            has_pov: true,
        }
    }

    #[test]
    fn axis_lookup_reflects_contents() {
        let caps = sample();
        assert_eq!(caps.num_axes(), 2);
        assert!(caps.has_axis(VirtualAxis::X));
        assert!(caps.has_axis(VirtualAxis::RotZ));
        assert!(!caps.has_axis(VirtualAxis::Slider));
    }

    #[test]
    fn force_feedback_flag_is_per_axis() {
        let caps = sample();
        assert!(caps.supports_force_feedback());
        assert_eq!(
            caps.axis_capability(VirtualAxis::RotZ)
                .map(|cap| cap.supports_force_feedback),
            Some(false)
        );
    }

    #[test]
    fn empty_capabilities_support_nothing() {
        let caps = Capabilities::default();
        assert_eq!(caps.num_axes(), 0);
        assert_eq!(caps.num_buttons, 0);
        assert!(!caps.has_pov);
        assert!(!caps.supports_force_feedback());
    }
}
