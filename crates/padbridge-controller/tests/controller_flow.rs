//! End-to-end facade scenarios: refresh → events → properties → force
//! feedback sampling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use padbridge_controller::{ElementChange, VirtualController};
use padbridge_ffb::{DirectionVector, Effect, EffectKind, ForceFeedbackDevice};
use padbridge_mapper::definitions;
use padbridge_mapper::{ActuatorMap, ElementMap, ElementMapper, MapperLayout};
use padbridge_schemas::prelude::*;

fn standard_controller() -> VirtualController {
    let layout = Arc::new(definitions::standard_gamepad());
    let device = Arc::new(ForceFeedbackDevice::new());
    VirtualController::new(1, layout, device).expect("valid controller")
}

fn connected(snapshot: GamepadSnapshot) -> PhysicalState {
    PhysicalState {
        connected: true,
        snapshot,
    }
}

#[test]
fn refresh_publishes_mapped_state() {
    let controller = standard_controller();
    let changes = controller.refresh_state(&connected(GamepadSnapshot {
        stick_left_x: 1111,
        button_a: true,
        ..Default::default()
    }));
    assert_eq!(changes, 2);

    let state = controller.state();
    assert_eq!(state.axis(VirtualAxis::X), 1111);
    assert!(state.buttons.is_pressed(VirtualButton::B1));
}

#[test]
fn disconnected_device_maps_to_neutral() {
    let controller = standard_controller();
    controller.refresh_state(&connected(GamepadSnapshot {
        stick_left_x: 20000,
        button_b: true,
        ..Default::default()
    }));
    assert_ne!(controller.state(), VirtualState::NEUTRAL);

    controller.refresh_state(&PhysicalState {
        connected: false,
        snapshot: GamepadSnapshot {
            stick_left_x: 20000,
            button_b: true,
            ..Default::default()
        },
    });
    assert_eq!(controller.state(), VirtualState::NEUTRAL);
}

#[test]
fn events_record_sequences_and_values() {
    let controller = standard_controller();
    controller
        .set_event_buffer_capacity(16)
        .expect("capacity accepted");

    controller.refresh_state(&connected(GamepadSnapshot {
        button_a: true,
        ..Default::default()
    }));
    controller.refresh_state(&connected(GamepadSnapshot::default()));

    let events = controller.pop_events(16);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].sequence, 1);
    assert_eq!(
        events[0].change,
        ElementChange::Button {
            button: VirtualButton::B1,
            pressed: true,
        }
    );
    assert_eq!(events[1].sequence, 2);
    assert_eq!(
        events[1].change,
        ElementChange::Button {
            button: VirtualButton::B1,
            pressed: false,
        }
    );
}

#[test]
fn unchanged_refresh_records_no_events() {
    let controller = standard_controller();
    controller
        .set_event_buffer_capacity(16)
        .expect("capacity accepted");
    let snapshot = connected(GamepadSnapshot {
        stick_left_x: 5000,
        ..Default::default()
    });
    assert_eq!(controller.refresh_state(&snapshot), 1);
    assert_eq!(controller.refresh_state(&snapshot), 0);
    assert_eq!(controller.pending_event_count(), 1);
}

#[test]
fn event_overflow_drops_oldest_and_clears_on_pop() {
    let controller = standard_controller();
    controller
        .set_event_buffer_capacity(2)
        .expect("capacity accepted");

    for value in [1000i16, 2000, 3000] {
        controller.refresh_state(&connected(GamepadSnapshot {
            stick_left_x: value,
            ..Default::default()
        }));
    }
    assert!(controller.has_event_overflow());

    let events = controller.pop_events(10);
    assert_eq!(events.len(), 2);
    // Sequence 1 was dropped to overflow; 2..=3 survive in order.
    assert_eq!(events[0].sequence, 2);
    assert_eq!(events[1].sequence, 3);
    assert!(!controller.has_event_overflow());
}

#[test]
fn listener_fires_only_on_change() {
    let controller = standard_controller();
    let fired = Arc::new(AtomicUsize::new(0));
    let observer = Arc::clone(&fired);
    controller.set_state_change_listener(Some(Arc::new(move || {
        observer.fetch_add(1, Ordering::SeqCst);
    })));

    let snapshot = connected(GamepadSnapshot {
        button_y: true,
        ..Default::default()
    });
    controller.refresh_state(&snapshot);
    controller.refresh_state(&snapshot);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn axis_properties_shape_reported_values() {
    let controller = standard_controller();
    controller
        .set_axis_deadzone(VirtualAxis::X, 2500)
        .expect("deadzone accepted");

    controller.refresh_state(&connected(GamepadSnapshot {
        stick_left_x: 4000,
        ..Default::default()
    }));
    // Inside the 25% deadzone: reported centred.
    assert_eq!(controller.state().axis(VirtualAxis::X), 0);

    controller
        .set_axis_range(VirtualAxis::Y, 0, 1000)
        .expect("range accepted");
    controller.refresh_state(&connected(GamepadSnapshot::default()));
    // A centred axis reports the centre of its configured range.
    assert_eq!(controller.state().axis(VirtualAxis::Y), 500);
}

#[test]
fn property_validation_propagates_errors() {
    let controller = standard_controller();
    assert!(matches!(
        controller.set_axis_deadzone(VirtualAxis::X, 10_001),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(controller.set_axis_range(VirtualAxis::X, 5, 5).is_err());
    assert!(controller.set_force_feedback_gain(10_001).is_err());
    assert!(matches!(
        controller.set_event_buffer_capacity(4096),
        Err(Error::CapacityExceeded { .. })
    ));
}

#[test]
fn force_feedback_requires_registration() {
    let controller = standard_controller();
    assert!(matches!(
        controller.force_feedback_device(),
        Err(Error::NotExclusiveRegistered)
    ));
    assert!(matches!(
        controller.sample_force_feedback(Some(0)),
        Err(Error::NotExclusiveRegistered)
    ));

    controller
        .force_feedback_register()
        .expect("registration succeeds");
    assert!(controller.is_force_feedback_registered());
    assert!(controller.force_feedback_device().is_ok());

    controller
        .force_feedback_unregister()
        .expect("unregistration succeeds");
    assert!(!controller.is_force_feedback_registered());
}

#[test]
fn registration_is_exclusive_across_controllers() {
    let layout = Arc::new(definitions::standard_gamepad());
    let device = Arc::new(ForceFeedbackDevice::new());
    let first =
        VirtualController::new(1, Arc::clone(&layout), Arc::clone(&device)).expect("controller");
    let second =
        VirtualController::new(2, layout, device).expect("controller");

    first.force_feedback_register().expect("first wins");
    assert!(matches!(
        second.force_feedback_register(),
        Err(Error::NotExclusiveRegistered)
    ));
    // The loser falls back to shared read-only use: state mapping still
    // works, force feedback does not.
    assert!(second.sample_force_feedback(Some(0)).is_err());

    first.force_feedback_unregister().expect("release");
    second
        .force_feedback_register()
        .expect("second acquires after release");
}

#[test]
fn actuatorless_layout_refuses_force_feedback() {
    let layout = Arc::new(MapperLayout::new(
        "NoActuators",
        ElementMap::from_entries([(
            PhysicalElement::StickLeftX,
            ElementMapper::axis(VirtualAxis::X),
        )]),
        ActuatorMap::NONE,
    ));
    let device = Arc::new(ForceFeedbackDevice::new());
    let controller = VirtualController::new(3, layout, device).expect("controller");

    assert!(!controller.supports_force_feedback());
    assert!(matches!(
        controller.force_feedback_register(),
        Err(Error::UnsupportedOperation(_))
    ));
}

#[test]
fn sample_force_feedback_reaches_actuators() {
    let controller = standard_controller();
    controller
        .force_feedback_register()
        .expect("registration succeeds");

    let mut effect = Effect::new(
        EffectKind::Constant { magnitude: 10000.0 },
        vec![VirtualAxis::X],
        DirectionVector::cartesian(&[1.0]).expect("valid direction"),
    )
    .expect("valid effect");
    effect.set_duration(None).expect("valid duration");

    controller.upload_effect(&effect).expect("upload succeeds");
    let device = controller.force_feedback_device().expect("registered");
    device
        .start_effect(effect.id(), 1, Some(0))
        .expect("start succeeds");

    let full = controller
        .sample_force_feedback(Some(10))
        .expect("sample succeeds");
    assert_eq!(full.left_motor, u16::MAX);
    assert_eq!(full.right_motor, u16::MAX);
    assert_eq!(full.left_impulse_trigger, 0);

    // Halving the global gain halves the actuator power.
    controller
        .set_force_feedback_gain(5000)
        .expect("gain accepted");
    let half = controller
        .sample_force_feedback(Some(20))
        .expect("sample succeeds");
    assert_eq!(half.left_motor, 32768);
}

#[test]
fn effects_on_device_survive_facade_queries() {
    let controller = standard_controller();
    controller
        .force_feedback_register()
        .expect("registration succeeds");

    let mut effect = Effect::new(
        EffectKind::Constant { magnitude: 100.0 },
        vec![VirtualAxis::X],
        DirectionVector::cartesian(&[1.0]).expect("valid direction"),
    )
    .expect("valid effect");
    effect.set_duration(Some(50)).expect("valid duration");
    controller.upload_effect(&effect).expect("upload succeeds");

    let device = controller.force_feedback_device().expect("registered");
    assert!(device.is_effect_on_device(effect.id()));
    assert_eq!(device.effect_ids(), vec![effect.id()]);
}
