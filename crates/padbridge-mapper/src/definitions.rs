//! The built-in mapper layouts.
//!
//! These mirror the documented virtual controller types games expect:
//! sticks on X/Y plus a second pair, d-pad on the hat or on X/Y, triggers
//! as buttons, dedicated axes, or a shared axis.

use padbridge_schemas::elements::{HatDirection, PhysicalElement, VirtualAxis, VirtualButton};
use padbridge_schemas::error::Result;

use crate::builder::MapperRegistry;
use crate::element::{AxisDirection, ElementMapper};
use crate::layout::{ElementMap, MapperLayout};

/// Sticks on X/Y/Z/RotZ, d-pad on the hat, triggers as buttons 7/8.
/// This is the default layout.
pub const STANDARD_GAMEPAD: &str = "StandardGamepad";

/// Like [`STANDARD_GAMEPAD`] but fully digital: sticks and d-pad drive
/// axes in full-travel steps, and there is no hat.
pub const DIGITAL_GAMEPAD: &str = "DigitalGamepad";

/// Six axes: triggers get RotX/RotY, ten buttons, hat on the d-pad.
pub const EXTENDED_GAMEPAD: &str = "ExtendedGamepad";

/// The native modern-gamepad shape: sticks on X/Y/RotX/RotY, triggers on
/// Z/RotZ.
pub const XINPUT_NATIVE: &str = "XInputNative";

/// Like [`XINPUT_NATIVE`] but both triggers share the Z axis, pulling in
/// opposite directions.
pub const XINPUT_SHARED_TRIGGERS: &str = "XInputSharedTriggers";

/// Name of the default built-in layout.
pub const DEFAULT_LAYOUT: &str = STANDARD_GAMEPAD;

fn face_buttons() -> [(PhysicalElement, ElementMapper); 6] {
    [
        (
            PhysicalElement::ButtonA,
            ElementMapper::button(VirtualButton::B1),
        ),
        (
            PhysicalElement::ButtonB,
            ElementMapper::button(VirtualButton::B2),
        ),
        (
            PhysicalElement::ButtonX,
            ElementMapper::button(VirtualButton::B3),
        ),
        (
            PhysicalElement::ButtonY,
            ElementMapper::button(VirtualButton::B4),
        ),
        (
            PhysicalElement::ButtonLB,
            ElementMapper::button(VirtualButton::B5),
        ),
        (
            PhysicalElement::ButtonRB,
            ElementMapper::button(VirtualButton::B6),
        ),
    ]
}

fn pov_dpad() -> [(PhysicalElement, ElementMapper); 4] {
    [
        (PhysicalElement::DpadUp, ElementMapper::pov(HatDirection::Up)),
        (
            PhysicalElement::DpadDown,
            ElementMapper::pov(HatDirection::Down),
        ),
        (
            PhysicalElement::DpadLeft,
            ElementMapper::pov(HatDirection::Left),
        ),
        (
            PhysicalElement::DpadRight,
            ElementMapper::pov(HatDirection::Right),
        ),
    ]
}

/// System and stick-click buttons at the given starting index.
fn rear_buttons(back: VirtualButton, start: VirtualButton, ls: VirtualButton, rs: VirtualButton)
    -> [(PhysicalElement, ElementMapper); 4] {
    [
        (PhysicalElement::ButtonBack, ElementMapper::button(back)),
        (PhysicalElement::ButtonStart, ElementMapper::button(start)),
        (PhysicalElement::ButtonLS, ElementMapper::button(ls)),
        (PhysicalElement::ButtonRS, ElementMapper::button(rs)),
    ]
}

/// Builds the `StandardGamepad` layout.
pub fn standard_gamepad() -> MapperLayout {
    let mut entries = vec![
        (
            PhysicalElement::StickLeftX,
            ElementMapper::axis(VirtualAxis::X),
        ),
        (
            PhysicalElement::StickLeftY,
            ElementMapper::axis(VirtualAxis::Y),
        ),
        (
            PhysicalElement::StickRightX,
            ElementMapper::axis(VirtualAxis::Z),
        ),
        (
            PhysicalElement::StickRightY,
            ElementMapper::axis(VirtualAxis::RotZ),
        ),
        (
            PhysicalElement::TriggerLT,
            ElementMapper::button(VirtualButton::B7),
        ),
        (
            PhysicalElement::TriggerRT,
            ElementMapper::button(VirtualButton::B8),
        ),
    ];
    entries.extend(pov_dpad());
    entries.extend(face_buttons());
    entries.extend(rear_buttons(
        VirtualButton::B9,
        VirtualButton::B10,
        VirtualButton::B11,
        VirtualButton::B12,
    ));
    MapperLayout::with_default_actuators(STANDARD_GAMEPAD, ElementMap::from_entries(entries))
}

/// Builds the `DigitalGamepad` layout.
pub fn digital_gamepad() -> MapperLayout {
    let mut entries = vec![
        (
            PhysicalElement::StickLeftX,
            ElementMapper::digital_axis(VirtualAxis::X),
        ),
        (
            PhysicalElement::StickLeftY,
            ElementMapper::digital_axis(VirtualAxis::Y),
        ),
        (
            PhysicalElement::StickRightX,
            ElementMapper::digital_axis(VirtualAxis::Z),
        ),
        (
            PhysicalElement::StickRightY,
            ElementMapper::digital_axis(VirtualAxis::RotZ),
        ),
        (
            PhysicalElement::DpadUp,
            ElementMapper::digital_axis_half(VirtualAxis::Y, AxisDirection::Negative),
        ),
        (
            PhysicalElement::DpadDown,
            ElementMapper::digital_axis_half(VirtualAxis::Y, AxisDirection::Positive),
        ),
        (
            PhysicalElement::DpadLeft,
            ElementMapper::digital_axis_half(VirtualAxis::X, AxisDirection::Negative),
        ),
        (
            PhysicalElement::DpadRight,
            ElementMapper::digital_axis_half(VirtualAxis::X, AxisDirection::Positive),
        ),
        (
            PhysicalElement::TriggerLT,
            ElementMapper::button(VirtualButton::B7),
        ),
        (
            PhysicalElement::TriggerRT,
            ElementMapper::button(VirtualButton::B8),
        ),
    ];
    entries.extend(face_buttons());
    entries.extend(rear_buttons(
        VirtualButton::B9,
        VirtualButton::B10,
        VirtualButton::B11,
        VirtualButton::B12,
    ));
    MapperLayout::with_default_actuators(DIGITAL_GAMEPAD, ElementMap::from_entries(entries))
}

/// Builds the `ExtendedGamepad` layout.
pub fn extended_gamepad() -> MapperLayout {
    let mut entries = vec![
        (
            PhysicalElement::StickLeftX,
            ElementMapper::axis(VirtualAxis::X),
        ),
        (
            PhysicalElement::StickLeftY,
            ElementMapper::axis(VirtualAxis::Y),
        ),
        (
            PhysicalElement::StickRightX,
            ElementMapper::axis(VirtualAxis::Z),
        ),
        (
            PhysicalElement::StickRightY,
            ElementMapper::axis(VirtualAxis::RotZ),
        ),
        (
            PhysicalElement::TriggerLT,
            ElementMapper::axis(VirtualAxis::RotX),
        ),
        (
            PhysicalElement::TriggerRT,
            ElementMapper::axis(VirtualAxis::RotY),
        ),
    ];
    entries.extend(pov_dpad());
    entries.extend(face_buttons());
    entries.extend(rear_buttons(
        VirtualButton::B7,
        VirtualButton::B8,
        VirtualButton::B9,
        VirtualButton::B10,
    ));
    MapperLayout::with_default_actuators(EXTENDED_GAMEPAD, ElementMap::from_entries(entries))
}

/// Builds the `XInputNative` layout.
pub fn xinput_native() -> MapperLayout {
    let mut entries = vec![
        (
            PhysicalElement::StickLeftX,
            ElementMapper::axis(VirtualAxis::X),
        ),
        (
            PhysicalElement::StickLeftY,
            ElementMapper::axis(VirtualAxis::Y),
        ),
        (
            PhysicalElement::StickRightX,
            ElementMapper::axis(VirtualAxis::RotX),
        ),
        (
            PhysicalElement::StickRightY,
            ElementMapper::axis(VirtualAxis::RotY),
        ),
        (
            PhysicalElement::TriggerLT,
            ElementMapper::axis(VirtualAxis::Z),
        ),
        (
            PhysicalElement::TriggerRT,
            ElementMapper::axis(VirtualAxis::RotZ),
        ),
    ];
    entries.extend(pov_dpad());
    entries.extend(face_buttons());
    entries.extend(rear_buttons(
        VirtualButton::B7,
        VirtualButton::B8,
        VirtualButton::B9,
        VirtualButton::B10,
    ));
    MapperLayout::with_default_actuators(XINPUT_NATIVE, ElementMap::from_entries(entries))
}

/// Builds the `XInputSharedTriggers` layout.
pub fn xinput_shared_triggers() -> MapperLayout {
    let mut entries = vec![
        (
            PhysicalElement::StickLeftX,
            ElementMapper::axis(VirtualAxis::X),
        ),
        (
            PhysicalElement::StickLeftY,
            ElementMapper::axis(VirtualAxis::Y),
        ),
        (
            PhysicalElement::StickRightX,
            ElementMapper::axis(VirtualAxis::RotX),
        ),
        (
            PhysicalElement::StickRightY,
            ElementMapper::axis(VirtualAxis::RotY),
        ),
        (
            PhysicalElement::TriggerLT,
            ElementMapper::axis_half(VirtualAxis::Z, AxisDirection::Positive),
        ),
        (
            PhysicalElement::TriggerRT,
            ElementMapper::axis_half(VirtualAxis::Z, AxisDirection::Negative),
        ),
    ];
    entries.extend(pov_dpad());
    entries.extend(face_buttons());
    entries.extend(rear_buttons(
        VirtualButton::B7,
        VirtualButton::B8,
        VirtualButton::B9,
        VirtualButton::B10,
    ));
    MapperLayout::with_default_actuators(XINPUT_SHARED_TRIGGERS, ElementMap::from_entries(entries))
}

/// Registers every built-in layout into the given registry.
pub fn register_built_in_layouts(registry: &mut MapperRegistry) -> Result<()> {
    registry.register(standard_gamepad())?;
    registry.register(digital_gamepad())?;
    registry.register(extended_gamepad())?;
    registry.register(xinput_native())?;
    registry.register(xinput_shared_triggers())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ins_register_cleanly() {
        let mut registry = MapperRegistry::new();
        register_built_in_layouts(&mut registry).expect("registration succeeds");
        assert_eq!(registry.len(), 5);
        assert!(registry.contains(DEFAULT_LAYOUT));
    }

    #[test]
    fn registering_twice_fails() {
        let mut registry = MapperRegistry::new();
        register_built_in_layouts(&mut registry).expect("first registration");
        assert!(register_built_in_layouts(&mut registry).is_err());
    }
}
