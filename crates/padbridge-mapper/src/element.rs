//! Element mappers: the per-element rules that turn one physical reading
//! into contributions on virtual controller elements.
//!
//! A mapper receives every poll of its physical element through one of the
//! three `contribute_from_*` methods and writes into a [`StateAccumulator`].
//! Axis contributions sum; button and hat contributions compose by logical
//! OR. Saturation happens once, in [`StateAccumulator::finish`], after every
//! mapper has contributed.

use padbridge_schemas::prelude::*;
use padbridge_schemas::state::{ANALOG_VALUE_MAX, ANALOG_VALUE_MIN, TRIGGER_VALUE_MID};

/// Inclusive analog travel beyond which a digital interpretation reads as
/// pressed, positive side.
const ANALOG_PRESS_POSITIVE: i16 = ANALOG_VALUE_MAX / 2;

/// Inclusive analog travel beyond which a digital interpretation reads as
/// pressed, negative side.
const ANALOG_PRESS_NEGATIVE: i16 = ANALOG_VALUE_MIN / 2;

/// Which part of an axis's travel a mapper drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisDirection {
    /// The whole travel.
    #[default]
    Both,
    /// Positive travel only.
    Positive,
    /// Negative travel only.
    Negative,
}

/// Intermediate virtual state while a layout sweep is in progress.
///
/// Axis slots are wide (`i32`) so multiple full-travel contributions can
/// stack without wrapping; the final clamp happens in [`finish`].
///
/// [`finish`]: StateAccumulator::finish
#[derive(Debug, Clone)]
pub struct StateAccumulator {
    axes: [i32; VirtualAxis::COUNT],
    buttons: ButtonSet,
    hat: HatState,
}

impl StateAccumulator {
    /// Accumulator starting from the neutral state.
    pub fn neutral() -> Self {
        StateAccumulator {
            axes: [0; VirtualAxis::COUNT],
            buttons: ButtonSet::EMPTY,
            hat: HatState::default(),
        }
    }

    /// Adds an amount to an axis. No clamping until [`Self::finish`].
    #[inline]
    pub fn contribute_axis(&mut self, axis: VirtualAxis, amount: i32) {
        self.axes[axis.index()] += amount;
    }

    /// Marks a button pressed. Releases never propagate, which is what
    /// gives multiple mappers on one button OR semantics.
    #[inline]
    pub fn press_button(&mut self, button: VirtualButton) {
        self.buttons.set(button, true);
    }

    /// Marks a hat direction component active, with OR semantics.
    #[inline]
    pub fn press_hat(&mut self, direction: HatDirection) {
        self.hat.set_component(direction, true);
    }

    /// Clamps every axis into the virtual range and yields the final state.
    pub fn finish(self) -> VirtualState {
        let mut axes = [0i32; VirtualAxis::COUNT];
        for (slot, sum) in axes.iter_mut().zip(self.axes) {
            *slot = sum.clamp(ANALOG_VALUE_MIN as i32, ANALOG_VALUE_MAX as i32);
        }
        VirtualState {
            axes,
            buttons: self.buttons,
            hat: self.hat,
        }
    }
}

/// One rule converting a physical element reading into virtual element
/// contributions.
///
/// Mappers are plain values owned by their layout; cloning a layout's
/// element map deep-copies them.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementMapper {
    /// Drives a virtual axis with the element's analog travel.
    Axis {
        /// Target axis.
        axis: VirtualAxis,
        /// Travel restriction.
        direction: AxisDirection,
    },
    /// Drives a virtual axis with full-travel steps only: analog input is
    /// digitized at half travel before contributing.
    DigitalAxis {
        /// Target axis.
        axis: VirtualAxis,
        /// Travel restriction.
        direction: AxisDirection,
    },
    /// Presses a virtual button when the element passes half travel.
    Button(VirtualButton),
    /// Activates one hat direction when the element passes half travel.
    Pov(HatDirection),
    /// Forwards to an inner mapper with the input reading inverted.
    Invert(Box<ElementMapper>),
    /// Routes the negative and positive halves of an analog reading to two
    /// different sub-mappers. An exactly-neutral reading routes to neither.
    SplitAxis {
        /// Receives the magnitude of negative readings.
        negative: Box<ElementMapper>,
        /// Receives positive readings.
        positive: Box<ElementMapper>,
    },
    /// Forwards the same input to every sub-mapper, in order.
    Compound(Vec<ElementMapper>),
}

impl ElementMapper {
    /// Full-travel axis mapper.
    pub fn axis(axis: VirtualAxis) -> Self {
        ElementMapper::Axis {
            axis,
            direction: AxisDirection::Both,
        }
    }

    /// Axis mapper restricted to one travel direction.
    pub fn axis_half(axis: VirtualAxis, direction: AxisDirection) -> Self {
        ElementMapper::Axis { axis, direction }
    }

    /// Full-travel digital axis mapper.
    pub fn digital_axis(axis: VirtualAxis) -> Self {
        ElementMapper::DigitalAxis {
            axis,
            direction: AxisDirection::Both,
        }
    }

    /// Digital axis mapper restricted to one travel direction.
    pub fn digital_axis_half(axis: VirtualAxis, direction: AxisDirection) -> Self {
        ElementMapper::DigitalAxis { axis, direction }
    }

    /// Button mapper.
    pub fn button(button: VirtualButton) -> Self {
        ElementMapper::Button(button)
    }

    /// Hat direction mapper.
    pub fn pov(direction: HatDirection) -> Self {
        ElementMapper::Pov(direction)
    }

    /// Inverting wrapper.
    pub fn invert(inner: ElementMapper) -> Self {
        ElementMapper::Invert(Box::new(inner))
    }

    /// Split-axis mapper over two halves.
    pub fn split(negative: ElementMapper, positive: ElementMapper) -> Self {
        ElementMapper::SplitAxis {
            negative: Box::new(negative),
            positive: Box::new(positive),
        }
    }

    /// Compound mapper over an ordered list.
    pub fn compound(mappers: Vec<ElementMapper>) -> Self {
        ElementMapper::Compound(mappers)
    }

    /// Contribution from a signed analog reading.
    pub fn contribute_from_analog(&self, accumulator: &mut StateAccumulator, value: i16) {
        match self {
            ElementMapper::Axis { axis, direction } => {
                let amount = match direction {
                    AxisDirection::Both => value as i32,
                    AxisDirection::Positive => (value as i32).max(0),
                    AxisDirection::Negative => {
                        if value < 0 {
                            -(value as i32)
                        } else {
                            0
                        }
                    }
                };
                accumulator.contribute_axis(*axis, amount);
            }
            ElementMapper::DigitalAxis { axis, direction } => {
                let amount = match direction {
                    AxisDirection::Both => {
                        if value >= ANALOG_PRESS_POSITIVE {
                            ANALOG_VALUE_MAX as i32
                        } else if value <= ANALOG_PRESS_NEGATIVE {
                            ANALOG_VALUE_MIN as i32
                        } else {
                            0
                        }
                    }
                    AxisDirection::Positive => {
                        if value >= ANALOG_PRESS_POSITIVE {
                            ANALOG_VALUE_MAX as i32
                        } else {
                            0
                        }
                    }
                    AxisDirection::Negative => {
                        if value <= ANALOG_PRESS_NEGATIVE {
                            ANALOG_VALUE_MIN as i32
                        } else {
                            0
                        }
                    }
                };
                accumulator.contribute_axis(*axis, amount);
            }
            ElementMapper::Button(button) => {
                if value >= ANALOG_PRESS_POSITIVE || value <= ANALOG_PRESS_NEGATIVE {
                    accumulator.press_button(*button);
                }
            }
            ElementMapper::Pov(direction) => {
                if value >= ANALOG_PRESS_POSITIVE || value <= ANALOG_PRESS_NEGATIVE {
                    accumulator.press_hat(*direction);
                }
            }
            ElementMapper::Invert(inner) => {
                // Reflection about the midpoint of the two's-complement range.
                let inverted = (-1i32 - value as i32) as i16;
                inner.contribute_from_analog(accumulator, inverted);
            }
            ElementMapper::SplitAxis { negative, positive } => {
                if value > 0 {
                    positive.contribute_from_analog(accumulator, value);
                } else if value < 0 {
                    let magnitude = (-(value as i32)).min(ANALOG_VALUE_MAX as i32) as i16;
                    negative.contribute_from_analog(accumulator, magnitude);
                }
            }
            ElementMapper::Compound(mappers) => {
                for mapper in mappers {
                    mapper.contribute_from_analog(accumulator, value);
                }
            }
        }
    }

    /// Contribution from an unsigned trigger reading.
    pub fn contribute_from_trigger(&self, accumulator: &mut StateAccumulator, value: u8) {
        const TRIGGER_SPAN: i32 = u8::MAX as i32;
        match self {
            ElementMapper::Axis { axis, direction } => {
                // A released trigger must contribute nothing, so the whole
                // travel lands on one side of the axis.
                let travel = value as i32;
                let amount = match direction {
                    AxisDirection::Both | AxisDirection::Positive => {
                        travel * ANALOG_VALUE_MAX as i32 / TRIGGER_SPAN
                    }
                    AxisDirection::Negative => travel * ANALOG_VALUE_MIN as i32 / TRIGGER_SPAN,
                };
                accumulator.contribute_axis(*axis, amount);
            }
            ElementMapper::DigitalAxis { axis, direction } => {
                if value >= TRIGGER_VALUE_MID {
                    let amount = match direction {
                        AxisDirection::Both | AxisDirection::Positive => ANALOG_VALUE_MAX as i32,
                        AxisDirection::Negative => ANALOG_VALUE_MIN as i32,
                    };
                    accumulator.contribute_axis(*axis, amount);
                }
            }
            ElementMapper::Button(button) => {
                if value >= TRIGGER_VALUE_MID {
                    accumulator.press_button(*button);
                }
            }
            ElementMapper::Pov(direction) => {
                if value >= TRIGGER_VALUE_MID {
                    accumulator.press_hat(*direction);
                }
            }
            ElementMapper::Invert(inner) => {
                inner.contribute_from_trigger(accumulator, u8::MAX - value);
            }
            ElementMapper::SplitAxis { negative, positive } => {
                if value >= TRIGGER_VALUE_MID {
                    positive.contribute_from_trigger(accumulator, value);
                } else {
                    negative.contribute_from_trigger(accumulator, value);
                }
            }
            ElementMapper::Compound(mappers) => {
                for mapper in mappers {
                    mapper.contribute_from_trigger(accumulator, value);
                }
            }
        }
    }

    /// Contribution from a digital pressed/released reading.
    pub fn contribute_from_digital(&self, accumulator: &mut StateAccumulator, pressed: bool) {
        match self {
            ElementMapper::Axis { axis, direction }
            | ElementMapper::DigitalAxis { axis, direction } => {
                if pressed {
                    let amount = match direction {
                        AxisDirection::Both | AxisDirection::Positive => ANALOG_VALUE_MAX as i32,
                        AxisDirection::Negative => ANALOG_VALUE_MIN as i32,
                    };
                    accumulator.contribute_axis(*axis, amount);
                }
            }
            ElementMapper::Button(button) => {
                if pressed {
                    accumulator.press_button(*button);
                }
            }
            ElementMapper::Pov(direction) => {
                if pressed {
                    accumulator.press_hat(*direction);
                }
            }
            ElementMapper::Invert(inner) => {
                inner.contribute_from_digital(accumulator, !pressed);
            }
            ElementMapper::SplitAxis { negative, positive } => {
                if pressed {
                    positive.contribute_from_digital(accumulator, true);
                } else {
                    negative.contribute_from_digital(accumulator, false);
                }
            }
            ElementMapper::Compound(mappers) => {
                for mapper in mappers {
                    mapper.contribute_from_digital(accumulator, pressed);
                }
            }
        }
    }

    /// Appends every virtual element this mapper can affect. Used only for
    /// capability derivation.
    pub fn collect_target_elements(&self, out: &mut Vec<VirtualElement>) {
        match self {
            ElementMapper::Axis { axis, .. } | ElementMapper::DigitalAxis { axis, .. } => {
                out.push(VirtualElement::Axis(*axis));
            }
            ElementMapper::Button(button) => out.push(VirtualElement::Button(*button)),
            ElementMapper::Pov(direction) => out.push(VirtualElement::Hat(*direction)),
            ElementMapper::Invert(inner) => inner.collect_target_elements(out),
            ElementMapper::SplitAxis { negative, positive } => {
                negative.collect_target_elements(out);
                positive.collect_target_elements(out);
            }
            ElementMapper::Compound(mappers) => {
                for mapper in mappers {
                    mapper.collect_target_elements(out);
                }
            }
        }
    }
}
