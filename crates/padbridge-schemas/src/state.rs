//! Physical gamepad snapshots and virtual controller state.

use serde::{Deserialize, Serialize};

use crate::elements::{HatDirection, VirtualAxis, VirtualButton};

/// Minimum analog stick reading.
pub const ANALOG_VALUE_MIN: i16 = i16::MIN;

/// Maximum analog stick reading.
pub const ANALOG_VALUE_MAX: i16 = i16::MAX;

/// Neutral analog stick reading.
pub const ANALOG_VALUE_NEUTRAL: i16 = 0;

/// Minimum trigger reading.
pub const TRIGGER_VALUE_MIN: u8 = u8::MIN;

/// Maximum trigger reading.
pub const TRIGGER_VALUE_MAX: u8 = u8::MAX;

/// Midpoint trigger reading, the threshold between released and pressed
/// when a trigger drives a digital element.
pub const TRIGGER_VALUE_MID: u8 = 128;

/// Raw readings of every element on a physical gamepad.
///
/// This is the wire-level view a driver produces on each poll: signed
/// 16-bit stick axes, unsigned 8-bit triggers, and one boolean per digital
/// element. All-default is the neutral, nothing-pressed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadSnapshot {
    /// Left stick, horizontal.
    pub stick_left_x: i16,
    /// Left stick, vertical.
    pub stick_left_y: i16,
    /// Right stick, horizontal.
    pub stick_right_x: i16,
    /// Right stick, vertical.
    pub stick_right_y: i16,
    /// Left trigger travel.
    pub trigger_lt: u8,
    /// Right trigger travel.
    pub trigger_rt: u8,
    /// Digital pad up.
    pub dpad_up: bool,
    /// Digital pad down.
    pub dpad_down: bool,
    /// Digital pad left.
    pub dpad_left: bool,
    /// Digital pad right.
    pub dpad_right: bool,
    /// A button.
    pub button_a: bool,
    /// B button.
    pub button_b: bool,
    /// X button.
    pub button_x: bool,
    /// Y button.
    pub button_y: bool,
    /// Left bumper.
    pub button_lb: bool,
    /// Right bumper.
    pub button_rb: bool,
    /// Back button.
    pub button_back: bool,
    /// Start button.
    pub button_start: bool,
    /// Left stick click.
    pub button_ls: bool,
    /// Right stick click.
    pub button_rs: bool,
}

/// A physical snapshot together with the device's connection status.
///
/// A disconnected device carries no meaningful readings; consumers map it
/// through the layout's neutral path instead of reading the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalState {
    /// Whether the physical device is currently connected.
    pub connected: bool,
    /// The most recent readings. Meaningless when `connected` is false.
    pub snapshot: GamepadSnapshot,
}

/// Pressed-state of up to 128 virtual buttons, packed one bit per button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonSet(u128);

impl ButtonSet {
    /// Set with no buttons pressed.
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// Whether the given button is pressed.
    #[inline]
    pub const fn is_pressed(&self, button: VirtualButton) -> bool {
        (self.0 >> button.index()) & 1 != 0
    }

    /// Marks the given button pressed or released.
    #[inline]
    pub fn set(&mut self, button: VirtualButton, pressed: bool) {
        let bit = 1u128 << button.index();
        if pressed {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    /// Whether any button is pressed.
    #[inline]
    pub const fn any_pressed(&self) -> bool {
        self.0 != 0
    }

    /// Raw bit representation, one bit per button index.
    #[inline]
    pub const fn bits(&self) -> u128 {
        self.0
    }
}

/// Direction components of the virtual hat. More than one component may be
/// active at once (diagonals); all-false is centered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatState {
    /// Up component active.
    pub up: bool,
    /// Down component active.
    pub down: bool,
    /// Left component active.
    pub left: bool,
    /// Right component active.
    pub right: bool,
}

impl HatState {
    /// Whether the hat is centered (no component active).
    #[inline]
    pub const fn is_centered(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Component for the given direction.
    #[inline]
    pub const fn component(&self, direction: HatDirection) -> bool {
        match direction {
            HatDirection::Up => self.up,
            HatDirection::Down => self.down,
            HatDirection::Left => self.left,
            HatDirection::Right => self.right,
        }
    }

    /// Sets the component for the given direction.
    #[inline]
    pub fn set_component(&mut self, direction: HatDirection, active: bool) {
        match direction {
            HatDirection::Up => self.up = active,
            HatDirection::Down => self.down = active,
            HatDirection::Left => self.left = active,
            HatDirection::Right => self.right = active,
        }
    }
}

/// Complete state of a virtual controller at one sample point.
///
/// Axis values stay within `[ANALOG_VALUE_MIN, ANALOG_VALUE_MAX]` when
/// produced by a mapper layout; application-configured range properties can
/// widen them afterwards, which is why the storage type is `i32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualState {
    /// One value per virtual axis, indexed by [`VirtualAxis::index`].
    pub axes: [i32; VirtualAxis::COUNT],
    /// Pressed-state of every virtual button.
    pub buttons: ButtonSet,
    /// Hat direction components.
    pub hat: HatState,
}

impl VirtualState {
    /// The all-neutral state: axes centered, nothing pressed, hat centered.
    pub const NEUTRAL: VirtualState = VirtualState {
        axes: [0; VirtualAxis::COUNT],
        buttons: ButtonSet::EMPTY,
        hat: HatState {
            up: false,
            down: false,
            left: false,
            right: false,
        },
    };

    /// Value of the given axis.
    #[inline]
    pub const fn axis(&self, axis: VirtualAxis) -> i32 {
        self.axes[axis.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_state_is_default() {
        assert_eq!(VirtualState::NEUTRAL, VirtualState::default());
        assert!(VirtualState::NEUTRAL.hat.is_centered());
        assert!(!VirtualState::NEUTRAL.buttons.any_pressed());
    }

    #[test]
    fn button_set_round_trips_each_index() {
        let mut set = ButtonSet::default();
        for index in [0u8, 1, 63, 64, 127] {
            let button = VirtualButton::new(index).expect("index in range");
            assert!(!set.is_pressed(button));
            set.set(button, true);
            assert!(set.is_pressed(button));
            set.set(button, false);
            assert!(!set.is_pressed(button));
        }
    }

    #[test]
    fn button_set_or_semantics_do_not_clear_neighbours() {
        let mut set = ButtonSet::default();
        set.set(VirtualButton::B1, true);
        set.set(VirtualButton::B12, true);
        set.set(VirtualButton::B12, false);
        assert!(set.is_pressed(VirtualButton::B1));
        assert!(!set.is_pressed(VirtualButton::B12));
    }

    #[test]
    fn hat_components_map_to_fields() {
        let mut hat = HatState::default();
        hat.set_component(HatDirection::Left, true);
        assert!(hat.left);
        assert!(hat.component(HatDirection::Left));
        assert!(!hat.is_centered());
    }
}
