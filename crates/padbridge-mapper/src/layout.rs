//! Mapper layouts: immutable assemblages of element mappers describing one
//! whole virtual controller, plus the actuator map that routes virtual
//! force-feedback magnitudes back to physical motors.

use padbridge_schemas::forces::{
    ActuatorComponents, EffectValue, OrderedMagnitudeComponents, PhysicalActuatorValue,
    EFFECT_MAGNITUDE_MAX, EFFECT_MODIFIER_MAX, EFFECT_MODIFIER_MIN,
};
use padbridge_schemas::prelude::*;

use crate::element::{ElementMapper, StateAccumulator};

/// Physical element mappers, one optional slot per physical element,
/// indexed by [`PhysicalElement`].
#[derive(Debug, Clone, Default)]
pub struct ElementMap {
    entries: [Option<ElementMapper>; PhysicalElement::COUNT],
}

impl ElementMap {
    /// Empty map: no element contributes anywhere.
    pub fn new() -> Self {
        ElementMap {
            entries: std::array::from_fn(|_| None),
        }
    }

    /// Map built from `(element, mapper)` pairs. Later pairs overwrite
    /// earlier ones for the same element.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (PhysicalElement, ElementMapper)>,
    ) -> Self {
        let mut map = ElementMap::new();
        for (element, mapper) in entries {
            map.set(element, Some(mapper));
        }
        map
    }

    /// Replaces the mapper slot for one element.
    pub fn set(&mut self, element: PhysicalElement, mapper: Option<ElementMapper>) {
        self.entries[element.index()] = mapper;
    }

    /// Mapper assigned to one element, if any.
    pub fn get(&self, element: PhysicalElement) -> Option<&ElementMapper> {
        self.entries[element.index()].as_ref()
    }

    /// Iterates every element together with its assigned mapper slot.
    pub fn iter(&self) -> impl Iterator<Item = (PhysicalElement, Option<&ElementMapper>)> {
        PhysicalElement::ALL
            .iter()
            .map(move |element| (*element, self.entries[element.index()].as_ref()))
    }
}

/// A physical actuator mapped by magnitude projection onto two virtual
/// axes: the actuator's power is the Euclidean magnitude of the force
/// vector's components on those axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actuator {
    /// First source axis of the projection.
    pub axis_first: VirtualAxis,
    /// Second source axis of the projection.
    pub axis_second: VirtualAxis,
}

impl Actuator {
    /// Projection onto the given axis pair.
    pub const fn magnitude_projection(axis_first: VirtualAxis, axis_second: VirtualAxis) -> Self {
        Actuator {
            axis_first,
            axis_second,
        }
    }
}

/// Assignment of physical actuators, one optional slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorMap {
    /// Left motor (low-frequency rumble).
    pub left_motor: Option<Actuator>,
    /// Right motor (high-frequency rumble).
    pub right_motor: Option<Actuator>,
    /// Impulse actuator in the left trigger.
    pub left_impulse_trigger: Option<Actuator>,
    /// Impulse actuator in the right trigger.
    pub right_impulse_trigger: Option<Actuator>,
}

impl ActuatorMap {
    /// No actuators at all; force feedback is unavailable.
    pub const NONE: ActuatorMap = ActuatorMap {
        left_motor: None,
        right_motor: None,
        left_impulse_trigger: None,
        right_impulse_trigger: None,
    };

    /// Whether any actuator is present.
    pub const fn has_any(&self) -> bool {
        self.left_motor.is_some()
            || self.right_motor.is_some()
            || self.left_impulse_trigger.is_some()
            || self.right_impulse_trigger.is_some()
    }

    /// Actuator slots in declaration order.
    pub const fn slots(&self) -> [Option<Actuator>; 4] {
        [
            self.left_motor,
            self.right_motor,
            self.left_impulse_trigger,
            self.right_impulse_trigger,
        ]
    }
}

impl Default for ActuatorMap {
    /// Both rumble motors projecting onto (X, Y); impulse triggers absent.
    fn default() -> Self {
        let motor = Actuator::magnitude_projection(VirtualAxis::X, VirtualAxis::Y);
        ActuatorMap {
            left_motor: Some(motor),
            right_motor: Some(motor),
            left_impulse_trigger: None,
            right_impulse_trigger: None,
        }
    }
}

/// Maps a physical controller layout to a virtual controller layout.
///
/// Instances are immutable once constructed and safely shareable across
/// threads; every mapping operation is a pure function of its inputs.
/// Capabilities are derived once, at construction.
#[derive(Debug, Clone)]
pub struct MapperLayout {
    name: String,
    elements: ElementMap,
    actuators: ActuatorMap,
    capabilities: Capabilities,
}

impl MapperLayout {
    /// Builds a layout from an element map and actuator map.
    pub fn new(name: impl Into<String>, elements: ElementMap, actuators: ActuatorMap) -> Self {
        let capabilities = derive_capabilities(&elements, &actuators);
        MapperLayout {
            name: name.into(),
            elements,
            actuators,
            capabilities,
        }
    }

    /// Builds a layout with the default actuator map.
    pub fn with_default_actuators(name: impl Into<String>, elements: ElementMap) -> Self {
        Self::new(name, elements, ActuatorMap::default())
    }

    /// Name under which this layout is registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities of the virtual controller this layout implements.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Read-only view of the element map.
    pub fn element_map(&self) -> &ElementMap {
        &self.elements
    }

    /// Deep copy of the element map, for seeding a builder blueprint.
    pub fn clone_element_map(&self) -> ElementMap {
        self.elements.clone()
    }

    /// This layout's actuator map.
    pub fn actuator_map(&self) -> ActuatorMap {
        self.actuators
    }

    /// Maps a physical snapshot to virtual controller state.
    ///
    /// Applies no application-configured properties such as deadzone or
    /// range; that is the facade's concern. `source_id` identifies the
    /// physical controller and is carried for mappers that distinguish
    /// sources; none of the built-in variants do.
    pub fn map_physical_to_virtual(
        &self,
        snapshot: &GamepadSnapshot,
        source_id: u32,
    ) -> VirtualState {
        let _ = source_id;
        let mut accumulator = StateAccumulator::neutral();

        for (element, slot) in self.elements.iter() {
            let Some(mapper) = slot else { continue };
            match element {
                PhysicalElement::StickLeftX => {
                    mapper.contribute_from_analog(&mut accumulator, snapshot.stick_left_x)
                }
                PhysicalElement::StickLeftY => {
                    mapper.contribute_from_analog(&mut accumulator, snapshot.stick_left_y)
                }
                PhysicalElement::StickRightX => {
                    mapper.contribute_from_analog(&mut accumulator, snapshot.stick_right_x)
                }
                PhysicalElement::StickRightY => {
                    mapper.contribute_from_analog(&mut accumulator, snapshot.stick_right_y)
                }
                PhysicalElement::TriggerLT => {
                    mapper.contribute_from_trigger(&mut accumulator, snapshot.trigger_lt)
                }
                PhysicalElement::TriggerRT => {
                    mapper.contribute_from_trigger(&mut accumulator, snapshot.trigger_rt)
                }
                PhysicalElement::DpadUp => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.dpad_up)
                }
                PhysicalElement::DpadDown => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.dpad_down)
                }
                PhysicalElement::DpadLeft => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.dpad_left)
                }
                PhysicalElement::DpadRight => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.dpad_right)
                }
                PhysicalElement::ButtonA => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_a)
                }
                PhysicalElement::ButtonB => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_b)
                }
                PhysicalElement::ButtonX => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_x)
                }
                PhysicalElement::ButtonY => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_y)
                }
                PhysicalElement::ButtonLB => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_lb)
                }
                PhysicalElement::ButtonRB => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_rb)
                }
                PhysicalElement::ButtonBack => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_back)
                }
                PhysicalElement::ButtonStart => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_start)
                }
                PhysicalElement::ButtonLS => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_ls)
                }
                PhysicalElement::ButtonRS => {
                    mapper.contribute_from_digital(&mut accumulator, snapshot.button_rs)
                }
            }
        }

        accumulator.finish()
    }

    /// Maps a completely neutral, possibly disconnected physical controller
    /// to virtual state, without requiring a snapshot.
    pub fn map_neutral_physical_to_virtual(&self, source_id: u32) -> VirtualState {
        self.map_physical_to_virtual(&GamepadSnapshot::default(), source_id)
    }

    /// Projects a virtual force magnitude vector onto physical actuators.
    ///
    /// `gain` is a scalar modifier in `0..=10000` applied to every actuator.
    pub fn project_force_feedback(
        &self,
        components: OrderedMagnitudeComponents,
        gain: EffectValue,
    ) -> ActuatorComponents {
        let gain_fraction =
            gain.clamp(EFFECT_MODIFIER_MIN, EFFECT_MODIFIER_MAX) / EFFECT_MODIFIER_MAX;

        let project = |slot: Option<Actuator>| -> PhysicalActuatorValue {
            let Some(actuator) = slot else { return 0 };
            let first = components[actuator.axis_first.index()];
            let second = components[actuator.axis_second.index()];
            let magnitude = (first * first + second * second).sqrt() * gain_fraction;
            let magnitude = magnitude.clamp(0.0, EFFECT_MAGNITUDE_MAX);
            ((magnitude / EFFECT_MAGNITUDE_MAX) * PhysicalActuatorValue::MAX as EffectValue).round()
                as PhysicalActuatorValue
        };

        ActuatorComponents {
            left_motor: project(self.actuators.left_motor),
            right_motor: project(self.actuators.right_motor),
            left_impulse_trigger: project(self.actuators.left_impulse_trigger),
            right_impulse_trigger: project(self.actuators.right_impulse_trigger),
        }
    }
}

/// Derives the aggregate capabilities of an element map and actuator map.
fn derive_capabilities(elements: &ElementMap, actuators: &ActuatorMap) -> Capabilities {
    let mut axis_present = [false; VirtualAxis::COUNT];
    let mut highest_button: Option<usize> = None;
    let mut has_pov = false;

    let mut targets = Vec::new();
    for (_, slot) in elements.iter() {
        let Some(mapper) = slot else { continue };
        targets.clear();
        mapper.collect_target_elements(&mut targets);
        for target in &targets {
            match target {
                VirtualElement::Axis(axis) => axis_present[axis.index()] = true,
                VirtualElement::Button(button) => {
                    highest_button =
                        Some(highest_button.map_or(button.index(), |h| h.max(button.index())));
                }
                VirtualElement::Hat(_) => has_pov = true,
            }
        }
    }

    let mut axis_force_feedback = [false; VirtualAxis::COUNT];
    for slot in actuators.slots().into_iter().flatten() {
        axis_force_feedback[slot.axis_first.index()] = true;
        axis_force_feedback[slot.axis_second.index()] = true;
    }

    let axes = VirtualAxis::ALL
        .iter()
        .filter(|axis| axis_present[axis.index()])
        .map(|axis| AxisCapability {
            axis: *axis,
            supports_force_feedback: axis_force_feedback[axis.index()],
        })
        .collect();

    Capabilities {
        axes,
        num_buttons: highest_button.map_or(0, |h| h as u16 + 1),
        has_pov,
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn four_sticks_to_x() -> MapperLayout {
        MapperLayout::with_default_actuators(
            "FourToX",
            ElementMap::from_entries([
                (
                    PhysicalElement::StickLeftX,
                    ElementMapper::axis(VirtualAxis::X),
                ),
                (
                    PhysicalElement::StickLeftY,
                    ElementMapper::axis(VirtualAxis::X),
                ),
                (
                    PhysicalElement::StickRightX,
                    ElementMapper::axis(VirtualAxis::X),
                ),
                (
                    PhysicalElement::StickRightY,
                    ElementMapper::axis(VirtualAxis::X),
                ),
            ]),
        )
    }

    proptest! {
        #[test]
        fn prop_axes_always_saturate(
            lx in i16::MIN..=i16::MAX,
            ly in i16::MIN..=i16::MAX,
            rx in i16::MIN..=i16::MAX,
            ry in i16::MIN..=i16::MAX,
        ) {
            let layout = four_sticks_to_x();
            let snapshot = GamepadSnapshot {
                stick_left_x: lx,
                stick_left_y: ly,
                stick_right_x: rx,
                stick_right_y: ry,
                ..Default::default()
            };
            let state = layout.map_physical_to_virtual(&snapshot, 0);
            for axis in VirtualAxis::ALL {
                let value = state.axis(axis);
                prop_assert!(value >= i16::MIN as i32 && value <= i16::MAX as i32);
            }
        }

        #[test]
        fn prop_mapping_is_deterministic(
            lx in i16::MIN..=i16::MAX,
            lt in u8::MIN..=u8::MAX,
            a in proptest::bool::ANY,
        ) {
            let layout = MapperLayout::with_default_actuators(
                "Det",
                ElementMap::from_entries([
                    (
                        PhysicalElement::StickLeftX,
                        ElementMapper::axis(VirtualAxis::X),
                    ),
                    (
                        PhysicalElement::TriggerLT,
                        ElementMapper::axis_half(VirtualAxis::Z, crate::element::AxisDirection::Positive),
                    ),
                    (
                        PhysicalElement::ButtonA,
                        ElementMapper::button(VirtualButton::B1),
                    ),
                ]),
            );
            let snapshot = GamepadSnapshot {
                stick_left_x: lx,
                trigger_lt: lt,
                button_a: a,
                ..Default::default()
            };
            prop_assert_eq!(
                layout.map_physical_to_virtual(&snapshot, 7),
                layout.map_physical_to_virtual(&snapshot, 7)
            );
        }

        #[test]
        fn prop_projection_output_bounded(
            x in -20_000.0f32..=20_000.0,
            y in -20_000.0f32..=20_000.0,
            gain in 0.0f32..=10_000.0,
        ) {
            let layout = four_sticks_to_x();
            let mut components = [0.0f32; VirtualAxis::COUNT];
            components[VirtualAxis::X.index()] = x;
            components[VirtualAxis::Y.index()] = y;
            let out = layout.project_force_feedback(components, gain);
            // u16 output is bounded by construction; the interesting part is
            // that the clamp prevented any NaN or negative intermediate.
            prop_assert!(out.left_motor == out.right_motor);
        }
    }
}
