//! Identifiers for physical gamepad elements and virtual controller elements.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One input element on the physical gamepad.
///
/// The set is fixed by the XInput-style controller model: four stick axes,
/// two analog triggers, a four-direction digital pad, and ten digital
/// buttons. The enum doubles as the index into a mapper layout's element
/// array, so discriminant order is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PhysicalElement {
    /// Left stick, horizontal reading.
    StickLeftX,
    /// Left stick, vertical reading.
    StickLeftY,
    /// Right stick, horizontal reading.
    StickRightX,
    /// Right stick, vertical reading.
    StickRightY,
    /// Left analog trigger.
    TriggerLT,
    /// Right analog trigger.
    TriggerRT,
    /// Digital pad, up.
    DpadUp,
    /// Digital pad, down.
    DpadDown,
    /// Digital pad, left.
    DpadLeft,
    /// Digital pad, right.
    DpadRight,
    /// A face button.
    ButtonA,
    /// B face button.
    ButtonB,
    /// X face button.
    ButtonX,
    /// Y face button.
    ButtonY,
    /// Left shoulder bumper.
    ButtonLB,
    /// Right shoulder bumper.
    ButtonRB,
    /// Back system button.
    ButtonBack,
    /// Start system button.
    ButtonStart,
    /// Left stick click.
    ButtonLS,
    /// Right stick click.
    ButtonRS,
}

impl PhysicalElement {
    /// Number of physical elements.
    pub const COUNT: usize = 20;

    /// Every physical element, in index order.
    pub const ALL: [PhysicalElement; Self::COUNT] = [
        PhysicalElement::StickLeftX,
        PhysicalElement::StickLeftY,
        PhysicalElement::StickRightX,
        PhysicalElement::StickRightY,
        PhysicalElement::TriggerLT,
        PhysicalElement::TriggerRT,
        PhysicalElement::DpadUp,
        PhysicalElement::DpadDown,
        PhysicalElement::DpadLeft,
        PhysicalElement::DpadRight,
        PhysicalElement::ButtonA,
        PhysicalElement::ButtonB,
        PhysicalElement::ButtonX,
        PhysicalElement::ButtonY,
        PhysicalElement::ButtonLB,
        PhysicalElement::ButtonRB,
        PhysicalElement::ButtonBack,
        PhysicalElement::ButtonStart,
        PhysicalElement::ButtonLS,
        PhysicalElement::ButtonRS,
    ];

    /// Position of this element in [`PhysicalElement::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Element at the given index, if within range.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid_argument("physical element index", index.to_string()))
    }
}

/// One axis on the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VirtualAxis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
    /// Rotation about X.
    RotX,
    /// Rotation about Y.
    RotY,
    /// Rotation about Z.
    RotZ,
    /// Slider axis.
    Slider,
    /// Dial axis.
    Dial,
}

impl VirtualAxis {
    /// Number of virtual axes.
    pub const COUNT: usize = 8;

    /// Every virtual axis, in index order.
    pub const ALL: [VirtualAxis; Self::COUNT] = [
        VirtualAxis::X,
        VirtualAxis::Y,
        VirtualAxis::Z,
        VirtualAxis::RotX,
        VirtualAxis::RotY,
        VirtualAxis::RotZ,
        VirtualAxis::Slider,
        VirtualAxis::Dial,
    ];

    /// Position of this axis in [`VirtualAxis::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One button on the virtual controller, identified by zero-based index.
///
/// At most [`VirtualButton::MAX_COUNT`] buttons exist; construction enforces
/// the bound so a stored `VirtualButton` is always a valid state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualButton(u8);

impl VirtualButton {
    /// Maximum number of virtual buttons a layout may expose.
    pub const MAX_COUNT: usize = 128;

    /// First button (index 0), named after its 1-based legacy label.
    pub const B1: VirtualButton = VirtualButton(0);
    /// Button 2.
    pub const B2: VirtualButton = VirtualButton(1);
    /// Button 3.
    pub const B3: VirtualButton = VirtualButton(2);
    /// Button 4.
    pub const B4: VirtualButton = VirtualButton(3);
    /// Button 5.
    pub const B5: VirtualButton = VirtualButton(4);
    /// Button 6.
    pub const B6: VirtualButton = VirtualButton(5);
    /// Button 7.
    pub const B7: VirtualButton = VirtualButton(6);
    /// Button 8.
    pub const B8: VirtualButton = VirtualButton(7);
    /// Button 9.
    pub const B9: VirtualButton = VirtualButton(8);
    /// Button 10.
    pub const B10: VirtualButton = VirtualButton(9);
    /// Button 11.
    pub const B11: VirtualButton = VirtualButton(10);
    /// Button 12.
    pub const B12: VirtualButton = VirtualButton(11);
    /// Button 13.
    pub const B13: VirtualButton = VirtualButton(12);
    /// Button 14.
    pub const B14: VirtualButton = VirtualButton(13);
    /// Button 15.
    pub const B15: VirtualButton = VirtualButton(14);
    /// Button 16.
    pub const B16: VirtualButton = VirtualButton(15);

    /// Button for the given zero-based index.
    pub fn new(index: u8) -> Result<Self> {
        if (index as usize) < Self::MAX_COUNT {
            Ok(VirtualButton(index))
        } else {
            Err(Error::invalid_argument(
                "virtual button index",
                index.to_string(),
            ))
        }
    }

    /// Zero-based index of this button.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One directional component of the virtual controller's hat (POV).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HatDirection {
    /// Up component.
    Up,
    /// Down component.
    Down,
    /// Left component.
    Left,
    /// Right component.
    Right,
}

impl HatDirection {
    /// Number of hat direction components.
    pub const COUNT: usize = 4;

    /// Every hat direction, in index order.
    pub const ALL: [HatDirection; Self::COUNT] = [
        HatDirection::Up,
        HatDirection::Down,
        HatDirection::Left,
        HatDirection::Right,
    ];

    /// Position of this direction in [`HatDirection::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Identifies one element of the virtual controller an element mapper can
/// write to. Used for capability derivation, never for state access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualElement {
    /// A virtual axis.
    Axis(VirtualAxis),
    /// A virtual button.
    Button(VirtualButton),
    /// One direction of the hat.
    Hat(HatDirection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_element_indices_match_all_order() {
        for (i, element) in PhysicalElement::ALL.iter().enumerate() {
            assert_eq!(element.index(), i);
            assert_eq!(PhysicalElement::from_index(i), Ok(*element));
        }
    }

    #[test]
    fn physical_element_index_out_of_range_is_rejected() {
        assert!(PhysicalElement::from_index(PhysicalElement::COUNT).is_err());
    }

    #[test]
    fn virtual_button_bound_is_enforced() {
        assert_eq!(VirtualButton::new(0), Ok(VirtualButton::B1));
        assert_eq!(VirtualButton::new(127).map(|b| b.index()), Ok(127));
        assert!(VirtualButton::new(128).is_err());
    }

    #[test]
    fn named_buttons_use_zero_based_indices() {
        assert_eq!(VirtualButton::B1.index(), 0);
        assert_eq!(VirtualButton::B12.index(), 11);
    }

    #[test]
    fn axis_indices_are_dense() {
        for (i, axis) in VirtualAxis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
    }
}
