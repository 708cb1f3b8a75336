//! The per-device virtual controller facade.
//!
//! One `VirtualController` wraps one mapper layout and one force feedback
//! device. A driver thread pushes physical snapshots in through
//! [`VirtualController::refresh_state`]; the legacy surface reads cached
//! state, configures per-axis properties, drains buffered state-change
//! events, and drives force feedback through the exclusive registration.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::debug;

use padbridge_ffb::{Effect, ForceFeedbackDevice};
use padbridge_mapper::MapperLayout;
use padbridge_schemas::elements::{HatDirection, VirtualAxis, VirtualButton};
use padbridge_schemas::error::{Error, Result};
use padbridge_schemas::forces::{ActuatorComponents, EffectTimeMs, EffectValue};
use padbridge_schemas::state::{PhysicalState, VirtualState};

use crate::events::{ElementChange, EventBuffer, StateChangeEvent};
use crate::properties::{AxisProperties, PROPERTY_MODIFIER_MAX};

/// Callback invoked after a refresh that recorded at least one event.
pub type StateChangeListener = Arc<dyn Fn() + Send + Sync>;

struct ControllerInner {
    state: VirtualState,
    axis_properties: [AxisProperties; VirtualAxis::COUNT],
    force_feedback_gain: u32,
    events: EventBuffer,
    listener: Option<StateChangeListener>,
}

/// Stateful wrapper presenting one mapper layout as a virtual device.
pub struct VirtualController {
    id: u32,
    layout: Arc<MapperLayout>,
    device: Arc<ForceFeedbackDevice>,
    created: Instant,
    inner: RwLock<ControllerInner>,
}

impl fmt::Debug for VirtualController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualController")
            .field("id", &self.id)
            .field("layout", &self.layout.name())
            .finish_non_exhaustive()
    }
}

impl VirtualController {
    /// Creates a controller over a layout and a force feedback device.
    ///
    /// `id` must be nonzero; it identifies this controller as the exclusive
    /// registrant on the device and is passed to the layout as the opaque
    /// source identifier.
    pub fn new(
        id: u32,
        layout: Arc<MapperLayout>,
        device: Arc<ForceFeedbackDevice>,
    ) -> Result<Self> {
        if id == 0 {
            return Err(Error::invalid_argument("controller id", "0"));
        }
        Ok(VirtualController {
            id,
            layout,
            device,
            created: Instant::now(),
            inner: RwLock::new(ControllerInner {
                state: VirtualState::NEUTRAL,
                axis_properties: [AxisProperties::default(); VirtualAxis::COUNT],
                force_feedback_gain: PROPERTY_MODIFIER_MAX,
                events: EventBuffer::new(),
                listener: None,
            }),
        })
    }

    /// This controller's identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The layout this controller presents.
    pub fn layout(&self) -> &Arc<MapperLayout> {
        &self.layout
    }

    /// Last published virtual state.
    pub fn state(&self) -> VirtualState {
        self.inner.read().state
    }

    /// Maps a fresh physical state through the layout and property
    /// transforms, publishes it, and records one event per changed
    /// element. Returns the number of events recorded (counting changes
    /// even when the event buffer is disabled).
    pub fn refresh_state(&self, physical: &PhysicalState) -> usize {
        let mapped = if physical.connected {
            self.layout.map_physical_to_virtual(&physical.snapshot, self.id)
        } else {
            self.layout.map_neutral_physical_to_virtual(self.id)
        };
        let timestamp_ms = self.created.elapsed().as_millis() as u64;

        let mut inner = self.inner.write();

        let mut new_state = mapped;
        for axis in VirtualAxis::ALL {
            new_state.axes[axis.index()] =
                inner.axis_properties[axis.index()].transform(mapped.axes[axis.index()]);
        }

        let previous = inner.state;
        inner.state = new_state;

        let mut changes = 0usize;
        for axis in VirtualAxis::ALL {
            let value = new_state.axis(axis);
            if value != previous.axis(axis) {
                changes += 1;
                inner.events.push(ElementChange::Axis { axis, value }, timestamp_ms);
            }
        }
        let changed_buttons = previous.buttons.bits() ^ new_state.buttons.bits();
        if changed_buttons != 0 {
            for index in 0..VirtualButton::MAX_COUNT as u8 {
                if changed_buttons >> index & 1 != 0 {
                    // Index is always in range by construction.
                    let Ok(button) = VirtualButton::new(index) else {
                        continue;
                    };
                    changes += 1;
                    inner.events.push(
                        ElementChange::Button {
                            button,
                            pressed: new_state.buttons.is_pressed(button),
                        },
                        timestamp_ms,
                    );
                }
            }
        }
        for direction in HatDirection::ALL {
            let active = new_state.hat.component(direction);
            if active != previous.hat.component(direction) {
                changes += 1;
                inner
                    .events
                    .push(ElementChange::Hat { direction, active }, timestamp_ms);
            }
        }

        let listener = if changes > 0 {
            inner.listener.clone()
        } else {
            None
        };
        drop(inner);

        if let Some(listener) = listener {
            listener();
        }
        changes
    }

    // ---- Properties ----

    /// Properties currently configured for one axis.
    pub fn axis_properties(&self, axis: VirtualAxis) -> AxisProperties {
        self.inner.read().axis_properties[axis.index()]
    }

    /// Sets the deadzone for one axis, in ten-thousandths of travel.
    pub fn set_axis_deadzone(&self, axis: VirtualAxis, deadzone: u32) -> Result<()> {
        self.inner.write().axis_properties[axis.index()].set_deadzone(deadzone)
    }

    /// Sets the saturation for one axis, in ten-thousandths of travel.
    pub fn set_axis_saturation(&self, axis: VirtualAxis, saturation: u32) -> Result<()> {
        self.inner.write().axis_properties[axis.index()].set_saturation(saturation)
    }

    /// Sets the reported range for one axis.
    pub fn set_axis_range(&self, axis: VirtualAxis, range_min: i32, range_max: i32) -> Result<()> {
        self.inner.write().axis_properties[axis.index()].set_range(range_min, range_max)
    }

    /// Enables or disables the property transform for one axis.
    pub fn set_axis_transform_enabled(&self, axis: VirtualAxis, enabled: bool) {
        self.inner.write().axis_properties[axis.index()].transform_enabled = enabled;
    }

    /// Global force feedback gain in `0..=10000`.
    pub fn force_feedback_gain(&self) -> u32 {
        self.inner.read().force_feedback_gain
    }

    /// Sets the global force feedback gain.
    pub fn set_force_feedback_gain(&self, gain: u32) -> Result<()> {
        if gain > PROPERTY_MODIFIER_MAX {
            return Err(Error::invalid_argument(
                "force feedback gain",
                gain.to_string(),
            ));
        }
        self.inner.write().force_feedback_gain = gain;
        Ok(())
    }

    // ---- Event buffer ----

    /// Sets the event buffer capacity; zero disables buffering.
    pub fn set_event_buffer_capacity(&self, capacity: usize) -> Result<()> {
        self.inner.write().events.set_capacity(capacity)
    }

    /// Configured event buffer capacity.
    pub fn event_buffer_capacity(&self) -> usize {
        self.inner.read().events.capacity()
    }

    /// Removes and returns up to `max` oldest events, clearing the
    /// overflow flag.
    pub fn pop_events(&self, max: usize) -> Vec<StateChangeEvent> {
        self.inner.write().events.pop_oldest(max)
    }

    /// Returns up to `max` oldest events without removing them.
    pub fn peek_events(&self, max: usize) -> Vec<StateChangeEvent> {
        self.inner.read().events.peek_oldest(max)
    }

    /// Number of buffered events.
    pub fn pending_event_count(&self) -> usize {
        self.inner.read().events.len()
    }

    /// Whether events were dropped since the last pop.
    pub fn has_event_overflow(&self) -> bool {
        self.inner.read().events.has_overflowed()
    }

    /// Installs or removes the state-change listener.
    pub fn set_state_change_listener(&self, listener: Option<StateChangeListener>) {
        self.inner.write().listener = listener;
    }

    // ---- Force feedback ----

    /// Whether this controller's layout can produce force feedback at all.
    pub fn supports_force_feedback(&self) -> bool {
        self.layout.actuator_map().has_any()
    }

    /// Registers this controller as the exclusive force feedback user of
    /// the underlying device.
    pub fn force_feedback_register(&self) -> Result<()> {
        if !self.supports_force_feedback() {
            return Err(Error::unsupported(
                "force feedback on a layout without actuators",
            ));
        }
        self.device.try_register_exclusive(self.id)?;
        debug!(controller = self.id, "registered for exclusive force feedback");
        Ok(())
    }

    /// Releases this controller's exclusive registration.
    pub fn force_feedback_unregister(&self) -> Result<()> {
        self.device.unregister_exclusive(self.id)
    }

    /// Whether this controller currently holds the exclusive registration.
    pub fn is_force_feedback_registered(&self) -> bool {
        self.device.is_registered_to(self.id)
    }

    /// Borrow of the underlying force feedback device, available only
    /// while exclusively registered.
    pub fn force_feedback_device(&self) -> Result<&ForceFeedbackDevice> {
        if self.is_force_feedback_registered() {
            Ok(&self.device)
        } else {
            Err(Error::NotExclusiveRegistered)
        }
    }

    /// Uploads an effect to the device, or updates it in place.
    pub fn upload_effect(&self, effect: &Effect) -> Result<()> {
        self.force_feedback_device()?.add_or_update_effect(effect)
    }

    /// Samples the force feedback device and projects the result onto the
    /// layout's physical actuators, applying the global gain. This is the
    /// per-sample path a driver calls on its output period.
    pub fn sample_force_feedback(
        &self,
        timestamp: Option<EffectTimeMs>,
    ) -> Result<ActuatorComponents> {
        let device = self.force_feedback_device()?;
        let components = device.play_effects(timestamp);
        let gain = self.inner.read().force_feedback_gain as EffectValue;
        Ok(self.layout.project_force_feedback(components, gain))
    }
}
